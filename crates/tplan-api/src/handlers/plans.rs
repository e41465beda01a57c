//! Travel plan handlers.

use axum::extract::{Path, State};
use axum::Json;

use tplan_models::{
    CreatePlanRequest, Created, Deleted, Envelope, NewPlan, PlanChanges, PlanSummary, TravelPlan,
    UpdatePlanRequest, Updated,
};

use crate::auth::AuthUser;
use crate::state::AppState;

pub async fn list_plans(
    State(state): State<AppState>,
    user: AuthUser,
) -> Json<Envelope<Vec<PlanSummary>>> {
    let result = state.plan_service.list(&user.id, &user.access_token).await;
    Json(Envelope::from_result(result))
}

pub async fn get_plan(
    State(state): State<AppState>,
    user: AuthUser,
    Path(plan_id): Path<String>,
) -> Json<Envelope<TravelPlan>> {
    let result = state.plan_service.get(&plan_id, &user.access_token).await;
    Json(Envelope::from_result(result))
}

pub async fn create_plan(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreatePlanRequest>,
) -> Json<Envelope<Created>> {
    let plan = NewPlan::from_request(user.id.as_str(), request);
    let result = state.plan_service.create(&plan, &user.access_token).await;
    Json(Envelope::from_result(result))
}

pub async fn update_plan(
    State(state): State<AppState>,
    user: AuthUser,
    Path(plan_id): Path<String>,
    Json(request): Json<UpdatePlanRequest>,
) -> Json<Envelope<Updated>> {
    let changes = PlanChanges::from(request);
    let result = state
        .plan_service
        .update(&plan_id, &changes, &user.access_token)
        .await;
    Json(Envelope::from_result(result))
}

pub async fn delete_plan(
    State(state): State<AppState>,
    user: AuthUser,
    Path(plan_id): Path<String>,
) -> Json<Envelope<Deleted>> {
    let result = state.plan_service.delete(&plan_id, &user.access_token).await;
    Json(Envelope::from_result(result))
}
