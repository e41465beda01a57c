//! Application state.

use std::sync::Arc;

use tplan_dashscope::DashScopeClient;
use tplan_oss::OssClient;
use tplan_supabase::SupabaseClient;

use crate::auth::TokenVerifier;
use crate::config::ApiConfig;
use crate::services::{AuthService, ExpenseService, PlanService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub supabase: Arc<SupabaseClient>,
    pub dashscope: Arc<DashScopeClient>,
    pub oss: Arc<OssClient>,
    /// Local token check, present when a JWT secret is configured
    pub token_verifier: Option<Arc<TokenVerifier>>,
    pub auth_service: AuthService,
    pub plan_service: PlanService,
    pub expense_service: ExpenseService,
}

impl AppState {
    /// Assemble state from already-built clients.
    pub fn new(
        config: ApiConfig,
        supabase: SupabaseClient,
        dashscope: DashScopeClient,
        oss: OssClient,
    ) -> Self {
        let token_verifier = supabase
            .config()
            .jwt_secret
            .as_deref()
            .map(|secret| Arc::new(TokenVerifier::new(secret)));

        let supabase = Arc::new(supabase);

        Self {
            config,
            auth_service: AuthService::new(Arc::clone(&supabase)),
            plan_service: PlanService::new(Arc::clone(&supabase)),
            expense_service: ExpenseService::new(Arc::clone(&supabase)),
            supabase,
            dashscope: Arc::new(dashscope),
            oss: Arc::new(oss),
            token_verifier,
        }
    }

    /// Create application state from environment variables.
    pub fn from_env(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let supabase = SupabaseClient::from_env()?;
        let dashscope = DashScopeClient::from_env()?;
        let oss = OssClient::from_env()?;

        Ok(Self::new(config, supabase, dashscope, oss))
    }
}
