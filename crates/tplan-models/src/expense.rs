//! Expense models (`expenses` table).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Category bucket for expenses recorded without one.
pub const UNCATEGORIZED: &str = "Other";

/// Expense creation request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExpenseRequest {
    pub plan_id: String,
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub expense_date: String,
    pub expense_time: String,
}

/// Partial expense update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateExpenseRequest {
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub expense_date: Option<String>,
    pub expense_time: Option<String>,
}

/// `expenses` row. Ids stay raw JSON (uuid or bigint).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: Value,
    pub plan_id: Option<Value>,
    pub user_id: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub expense_date: Option<String>,
    pub expense_time: Option<String>,
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Insert payload for `expenses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub user_id: String,
    pub plan_id: String,
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub expense_date: String,
    pub expense_time: String,
}

impl NewExpense {
    pub fn from_request(user_id: impl Into<String>, request: CreateExpenseRequest) -> Self {
        Self {
            user_id: user_id.into(),
            plan_id: request.plan_id,
            category: request.category,
            description: request.description,
            amount: request.amount,
            expense_date: request.expense_date,
            expense_time: request.expense_time,
        }
    }
}

/// Update payload for `expenses`; `None` fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpenseChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_time: Option<String>,
}

impl From<UpdateExpenseRequest> for ExpenseChanges {
    fn from(request: UpdateExpenseRequest) -> Self {
        Self {
            category: request.category,
            description: request.description,
            amount: request.amount,
            expense_date: request.expense_date,
            expense_time: request.expense_time,
        }
    }
}

/// Spending totals for one plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    pub total: f64,
    pub count: usize,
    pub by_category: BTreeMap<String, f64>,
}

impl ExpenseSummary {
    pub fn from_expenses(expenses: &[ExpenseRecord]) -> Self {
        let mut summary = Self {
            count: expenses.len(),
            ..Self::default()
        };

        for expense in expenses {
            // NULL amounts count as zero
            let amount = expense.amount.unwrap_or_default();
            summary.total += amount;
            let category = expense
                .category
                .as_deref()
                .unwrap_or(UNCATEGORIZED)
                .to_string();
            *summary.by_category.entry(category).or_insert(0.0) += amount;
        }

        summary
    }
}
