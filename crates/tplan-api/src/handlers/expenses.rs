//! Expense handlers.

use axum::extract::{Path, State};
use axum::Json;

use tplan_models::{
    CreateExpenseRequest, Created, Deleted, Envelope, ExpenseChanges, ExpenseRecord,
    ExpenseSummary, NewExpense, UpdateExpenseRequest, Updated,
};

use crate::auth::AuthUser;
use crate::state::AppState;

pub async fn list_expenses(
    State(state): State<AppState>,
    user: AuthUser,
    Path(plan_id): Path<String>,
) -> Json<Envelope<Vec<ExpenseRecord>>> {
    let result = state.expense_service.list(&plan_id, &user.access_token).await;
    Json(Envelope::from_result(result))
}

pub async fn expense_summary(
    State(state): State<AppState>,
    user: AuthUser,
    Path(plan_id): Path<String>,
) -> Json<Envelope<ExpenseSummary>> {
    let result = state
        .expense_service
        .summary(&plan_id, &user.access_token)
        .await;
    Json(Envelope::from_result(result))
}

/// The owner is always the caller, whatever the body says.
pub async fn create_expense(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateExpenseRequest>,
) -> Json<Envelope<Created>> {
    let expense = NewExpense::from_request(user.id.as_str(), request);
    let result = state
        .expense_service
        .create(&expense, &user.access_token)
        .await;
    Json(Envelope::from_result(result))
}

pub async fn update_expense(
    State(state): State<AppState>,
    user: AuthUser,
    Path(expense_id): Path<String>,
    Json(request): Json<UpdateExpenseRequest>,
) -> Json<Envelope<Updated>> {
    let changes = ExpenseChanges::from(request);
    let result = state
        .expense_service
        .update(&expense_id, &changes, &user.access_token)
        .await;
    Json(Envelope::from_result(result))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    user: AuthUser,
    Path(expense_id): Path<String>,
) -> Json<Envelope<Deleted>> {
    let result = state
        .expense_service
        .delete(&expense_id, &user.access_token)
        .await;
    Json(Envelope::from_result(result))
}
