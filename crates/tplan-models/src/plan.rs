//! Travel plan models (`travel_plans` table).

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Columns returned by the plan list endpoint.
pub const PLAN_SUMMARY_COLUMNS: &str = "id, title, destination, days, budget, start_date, created_at";

/// Title used when the AI omits one.
pub const DEFAULT_PLAN_TITLE: &str = "Untitled trip";

/// Destination used when the AI omits one.
pub const DEFAULT_DESTINATION: &str = "Unknown destination";

/// Days between today and the default start date of an AI-drafted plan.
const DEFAULT_START_OFFSET_DAYS: i64 = 3;

/// Plan creation request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlanRequest {
    pub title: String,
    pub destination: String,
    pub days: i32,
    pub budget: f64,
    pub travelers: i32,
    pub preferences: Vec<String>,
    pub start_date: String,
    pub summary: String,
    /// Raw model response; only its text is persisted.
    pub ai_response: Value,
}

/// Partial plan update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePlanRequest {
    pub title: Option<String>,
    pub destination: Option<String>,
    pub days: Option<i32>,
    pub budget: Option<f64>,
    pub travelers: Option<i32>,
    pub preferences: Option<Vec<String>>,
    pub start_date: Option<String>,
    pub summary: Option<String>,
    pub ai_response: Option<Value>,
}

/// Row projection used by the plan list.
///
/// Ids are kept as raw JSON since tables may key on uuid or bigint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub id: Value,
    pub title: Option<String>,
    pub destination: Option<String>,
    pub days: Option<i32>,
    pub budget: Option<f64>,
    pub start_date: Option<String>,
    pub created_at: Option<String>,
}

/// Full `travel_plans` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelPlan {
    pub id: Value,
    pub user_id: Option<String>,
    pub title: Option<String>,
    pub destination: Option<String>,
    pub days: Option<i32>,
    pub budget: Option<f64>,
    pub travelers: Option<i32>,
    pub preferences: Option<Vec<String>>,
    pub start_date: Option<String>,
    pub summary: Option<String>,
    pub ai_response: Option<Value>,
    pub created_at: Option<String>,
    /// Columns this service does not model, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Insert payload for `travel_plans`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlan {
    pub user_id: String,
    pub title: String,
    pub destination: String,
    pub days: i32,
    pub budget: f64,
    pub travelers: i32,
    pub preferences: Vec<String>,
    pub start_date: String,
    pub summary: String,
    pub ai_response: Option<Value>,
}

impl NewPlan {
    /// Build the insert row for a client-submitted plan.
    pub fn from_request(user_id: impl Into<String>, request: CreatePlanRequest) -> Self {
        Self {
            user_id: user_id.into(),
            title: request.title,
            destination: request.destination,
            days: request.days,
            budget: request.budget,
            travelers: request.travelers,
            preferences: request.preferences,
            start_date: request.start_date,
            summary: request.summary,
            ai_response: ai_response_text(&request.ai_response),
        }
    }

    /// Draft a plan from the JSON object produced by the planning model.
    ///
    /// Missing or blank fields fall back to defaults; the full object is kept
    /// in `ai_response`.
    pub fn from_ai_output(
        user_id: impl Into<String>,
        output: &Value,
        today: NaiveDate,
    ) -> Result<Self, String> {
        let object = output
            .as_object()
            .ok_or_else(|| "AI response is not a JSON object".to_string())?;

        let text = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or_default()
                .to_string()
        };
        let non_empty = |value: String, fallback: &str| {
            if value.is_empty() {
                fallback.to_string()
            } else {
                value
            }
        };

        let start_date = non_empty(
            text("start_date"),
            &(today + Duration::days(DEFAULT_START_OFFSET_DAYS))
                .format("%Y-%m-%d")
                .to_string(),
        );

        let preferences = match object.get("preferences") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            user_id: user_id.into(),
            title: non_empty(text("title"), DEFAULT_PLAN_TITLE),
            destination: non_empty(text("destination"), DEFAULT_DESTINATION),
            days: lenient_i32(object.get("days")).unwrap_or(1),
            budget: lenient_f64(object.get("budget")).unwrap_or(0.0),
            travelers: lenient_i32(object.get("travelers")).unwrap_or(1),
            preferences,
            start_date,
            summary: text("summary"),
            ai_response: Some(output.clone()),
        })
    }
}

/// Update payload for `travel_plans`; `None` fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlanChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travelers: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_response: Option<Value>,
}

impl From<UpdatePlanRequest> for PlanChanges {
    fn from(request: UpdatePlanRequest) -> Self {
        let ai_response = request.ai_response.map(|raw| {
            if is_blank(&raw) {
                raw
            } else {
                ai_response_text(&raw).unwrap_or(raw)
            }
        });

        Self {
            title: request.title,
            destination: request.destination,
            days: request.days,
            budget: request.budget,
            travelers: request.travelers,
            preferences: request.preferences,
            start_date: request.start_date,
            summary: request.summary,
            ai_response,
        }
    }
}

/// Text worth persisting from a model response.
///
/// Looks for `output.text`, then `text`, and otherwise keeps the whole
/// response rendered as a JSON string. Blank input yields `None`.
pub fn ai_response_text(raw: &Value) -> Option<Value> {
    if is_blank(raw) {
        return None;
    }

    let nested = raw.get("output").and_then(|output| output.get("text"));
    if let Some(text) = nested.filter(|v| !is_blank(v)) {
        return Some(text.clone());
    }
    if let Some(text) = raw.get("text").filter(|v| !is_blank(v)) {
        return Some(text.clone());
    }

    Some(Value::String(raw.to_string()))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn lenient_i32(value: Option<&Value>) -> Option<i32> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_ai_response_text_prefers_output_text() {
        let raw = json!({"output": {"text": "Day 1: Kyoto"}, "text": "ignored"});
        assert_eq!(ai_response_text(&raw), Some(json!("Day 1: Kyoto")));
    }

    #[test]
    fn test_ai_response_text_falls_back() {
        assert_eq!(ai_response_text(&json!({"text": "plain"})), Some(json!("plain")));

        let raw = json!({"foo": 1});
        assert_eq!(ai_response_text(&raw), Some(json!("{\"foo\":1}")));

        assert_eq!(ai_response_text(&json!({})), None);
        assert_eq!(ai_response_text(&Value::Null), None);
    }

    #[test]
    fn test_from_ai_output_applies_defaults() {
        let output = json!({"title": "  ", "preferences": "food"});
        let plan = NewPlan::from_ai_output("user-1", &output, today()).unwrap();

        assert_eq!(plan.user_id, "user-1");
        assert_eq!(plan.title, DEFAULT_PLAN_TITLE);
        assert_eq!(plan.destination, DEFAULT_DESTINATION);
        assert_eq!(plan.days, 1);
        assert_eq!(plan.budget, 0.0);
        assert_eq!(plan.travelers, 1);
        assert!(plan.preferences.is_empty());
        assert_eq!(plan.start_date, "2025-03-13");
        assert_eq!(plan.summary, "");
        assert_eq!(plan.ai_response, Some(output));
    }

    #[test]
    fn test_from_ai_output_keeps_values() {
        let output = json!({
            "title": " Tokyo getaway ",
            "destination": "Tokyo",
            "days": 5,
            "budget": "12000.5",
            "travelers": 2,
            "preferences": ["food", "anime"],
            "start_date": "2025-04-01",
            "summary": "Five days in Tokyo"
        });
        let plan = NewPlan::from_ai_output("u", &output, today()).unwrap();

        assert_eq!(plan.title, "Tokyo getaway");
        assert_eq!(plan.days, 5);
        assert_eq!(plan.budget, 12000.5);
        assert_eq!(plan.travelers, 2);
        assert_eq!(plan.preferences, vec!["food", "anime"]);
        assert_eq!(plan.start_date, "2025-04-01");
    }

    #[test]
    fn test_from_ai_output_rejects_non_object() {
        assert!(NewPlan::from_ai_output("u", &json!("just text"), today()).is_err());
    }

    #[test]
    fn test_plan_changes_skip_absent_fields() {
        let changes = PlanChanges::from(UpdatePlanRequest {
            title: Some("New title".into()),
            ai_response: Some(json!({"output": {"text": "updated"}})),
            ..Default::default()
        });

        assert_eq!(
            serde_json::to_value(&changes).unwrap(),
            json!({"title": "New title", "ai_response": "updated"})
        );
    }

    #[test]
    fn test_travel_plan_keeps_unknown_columns() {
        let row = json!({
            "id": "p1", "user_id": "u1", "title": "T", "destination": "D",
            "days": 2, "budget": 100.0, "travelers": 1, "preferences": [],
            "start_date": "2025-01-01", "summary": null, "ai_response": null,
            "created_at": "2025-01-01T00:00:00Z", "updated_at": "2025-01-02T00:00:00Z"
        });
        let plan: TravelPlan = serde_json::from_value(row.clone()).unwrap();
        assert_eq!(plan.extra.get("updated_at"), Some(&json!("2025-01-02T00:00:00Z")));
        assert_eq!(serde_json::to_value(&plan).unwrap(), row);
    }

    #[test]
    fn test_rows_with_numeric_ids_and_nulls() {
        let rows = json!([
            {"id": 7, "title": "Numeric id", "destination": "Xi'an", "days": 2, "budget": 800},
            {"id": "p2", "title": null, "destination": null, "days": null, "budget": null,
             "start_date": null, "created_at": null}
        ]);
        let plans: Vec<PlanSummary> = serde_json::from_value(rows).unwrap();
        assert_eq!(plans[0].id, json!(7));
        assert_eq!(plans[0].budget, Some(800.0));
        assert_eq!(plans[1].id, json!("p2"));
        assert_eq!(plans[1].title, None);

        let plan: TravelPlan =
            serde_json::from_value(json!({"id": 9, "user_id": "u1", "title": null})).unwrap();
        assert_eq!(serde_json::to_value(&plan).unwrap()["id"], json!(9));
        assert_eq!(plan.days, None);
    }
}
