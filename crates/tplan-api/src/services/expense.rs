//! Expense service (`expenses` table).

use std::sync::Arc;

use serde_json::Value;

use tplan_models::{
    Created, Deleted, ExpenseChanges, ExpenseRecord, ExpenseSummary, NewExpense, Updated,
};
use tplan_supabase::{Order, SupabaseClient};

use crate::error::{ApiError, ApiResult};
use crate::services::first_row_id;

const EXPENSES_TABLE: &str = "expenses";

#[derive(Clone)]
pub struct ExpenseService {
    supabase: Arc<SupabaseClient>,
}

impl ExpenseService {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Expenses of a plan, latest date first.
    pub async fn list(&self, plan_id: &str, access_token: &str) -> ApiResult<Vec<ExpenseRecord>> {
        let expenses = self
            .supabase
            .table(EXPENSES_TABLE)
            .select("*")
            .eq("plan_id", plan_id)
            .order("expense_date", Order::Desc)
            .fetch(access_token)
            .await?;
        Ok(expenses)
    }

    pub async fn create(&self, expense: &NewExpense, access_token: &str) -> ApiResult<Created> {
        let rows: Vec<Value> = self
            .supabase
            .table(EXPENSES_TABLE)
            .insert(expense, access_token)
            .await?;

        first_row_id(&rows)
            .map(|id| Created { id })
            .ok_or_else(|| ApiError::internal("Failed to create expense"))
    }

    pub async fn update(
        &self,
        expense_id: &str,
        changes: &ExpenseChanges,
        access_token: &str,
    ) -> ApiResult<Updated> {
        let rows: Vec<Value> = self
            .supabase
            .table(EXPENSES_TABLE)
            .eq("id", expense_id)
            .update(changes, access_token)
            .await?;

        if rows.is_empty() {
            return Err(ApiError::not_found("Update failed"));
        }
        Ok(Updated::new(expense_id))
    }

    pub async fn delete(&self, expense_id: &str, access_token: &str) -> ApiResult<Deleted> {
        self.supabase
            .table(EXPENSES_TABLE)
            .eq("id", expense_id)
            .delete(access_token)
            .await?;
        Ok(Deleted::new(expense_id))
    }

    pub async fn summary(&self, plan_id: &str, access_token: &str) -> ApiResult<ExpenseSummary> {
        let expenses = self.list(plan_id, access_token).await?;
        Ok(ExpenseSummary::from_expenses(&expenses))
    }
}
