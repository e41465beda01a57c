//! Business logic services.

pub mod auth;
pub mod expense;
pub mod plan;

pub use auth::AuthService;
pub use expense::ExpenseService;
pub use plan::PlanService;

use serde_json::Value;

/// `id` of the first row returned by an insert.
///
/// Ids may come back as strings (uuid) or numbers (bigint).
pub(crate) fn first_row_id(rows: &[Value]) -> Option<String> {
    match rows.first()?.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
