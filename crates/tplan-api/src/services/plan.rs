//! Travel plan service (`travel_plans` table).

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use tplan_models::plan::PLAN_SUMMARY_COLUMNS;
use tplan_models::{Created, Deleted, NewPlan, PlanChanges, PlanSummary, TravelPlan, Updated};
use tplan_supabase::{Order, SupabaseClient};

use crate::error::{ApiError, ApiResult};
use crate::services::first_row_id;

const PLANS_TABLE: &str = "travel_plans";

/// Plan CRUD. Every call runs as the caller through their access token.
#[derive(Clone)]
pub struct PlanService {
    supabase: Arc<SupabaseClient>,
}

impl PlanService {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Plans of `user_id`, newest first.
    pub async fn list(&self, user_id: &str, access_token: &str) -> ApiResult<Vec<PlanSummary>> {
        let plans = self
            .supabase
            .table(PLANS_TABLE)
            .select(PLAN_SUMMARY_COLUMNS)
            .eq("user_id", user_id)
            .order("created_at", Order::Desc)
            .fetch(access_token)
            .await?;
        Ok(plans)
    }

    pub async fn get(&self, plan_id: &str, access_token: &str) -> ApiResult<TravelPlan> {
        self.supabase
            .table(PLANS_TABLE)
            .select("*")
            .eq("id", plan_id)
            .fetch_single(access_token)
            .await?
            .ok_or_else(|| ApiError::not_found("Plan not found"))
    }

    pub async fn create(&self, plan: &NewPlan, access_token: &str) -> ApiResult<Created> {
        let rows: Vec<Value> = self
            .supabase
            .table(PLANS_TABLE)
            .insert(plan, access_token)
            .await?;

        let id = first_row_id(&rows).ok_or_else(|| ApiError::internal("Failed to create plan"))?;
        info!(plan_id = %id, "Plan created");
        Ok(Created { id })
    }

    /// Apply `changes`; fails with "Update failed" when no row was visible to update.
    pub async fn update(
        &self,
        plan_id: &str,
        changes: &PlanChanges,
        access_token: &str,
    ) -> ApiResult<Updated> {
        let rows: Vec<Value> = self
            .supabase
            .table(PLANS_TABLE)
            .eq("id", plan_id)
            .update(changes, access_token)
            .await?;

        if rows.is_empty() {
            return Err(ApiError::not_found("Update failed"));
        }
        Ok(Updated::new(plan_id))
    }

    pub async fn delete(&self, plan_id: &str, access_token: &str) -> ApiResult<Deleted> {
        self.supabase
            .table(PLANS_TABLE)
            .eq("id", plan_id)
            .delete(access_token)
            .await?;
        Ok(Deleted::new(plan_id))
    }
}
