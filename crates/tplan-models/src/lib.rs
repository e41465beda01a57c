//! Shared data models for the travel planner backend.
//!
//! This crate provides Serde-serializable types for:
//! - The `{data, error}` response envelope
//! - Auth requests, user profiles and session tokens
//! - Travel plan and expense rows as stored by Supabase
//! - AI completion, speech recognition and file upload payloads

pub mod ai;
pub mod auth;
pub mod envelope;
pub mod expense;
pub mod media;
pub mod plan;

// Re-export common types
pub use ai::{CompletionRequest, CompletionResponse, GeneratePlanRequest, GeneratePlanResponse};
pub use auth::{
    AuthResponse, LoginRequest, MeResponse, MessageResponse, RefreshTokenRequest,
    RegisterRequest, SessionTokens, UpdatePasswordRequest, UserProfile,
};
pub use envelope::{Created, Deleted, Envelope, ErrorBody, Updated};
pub use expense::{
    CreateExpenseRequest, ExpenseChanges, ExpenseRecord, ExpenseSummary, NewExpense,
    UpdateExpenseRequest, UNCATEGORIZED,
};
pub use media::{
    file_extension, DeleteFileRequest, DeleteFileResponse, RecognizeResponse,
    RecognizeUrlRequest, UploadResponse, DEFAULT_AUDIO_EXTENSION,
};
pub use plan::{
    ai_response_text, CreatePlanRequest, NewPlan, PlanChanges, PlanSummary, TravelPlan,
    UpdatePlanRequest,
};
