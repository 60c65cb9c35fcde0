use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use pickdesk_models::{
    ClientPick, ClientPickFilter, InjuryUpdate, IntelligenceUpdate, LineMovement, NewInjury,
    NewIntelligence, NewLineMovement, NewPick, NewPlayerProp, OutcomeCorrection, Pick, PickOutcome,
    PickPatch, PlayerProp, Report, Sport, SystemPerformance,
};
use pickdesk_services::ReportDesk;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;

const MAX_PAGE_LIMIT: u32 = 100;

#[derive(Clone)]
pub struct AppState {
    pub desk: Arc<ReportDesk>,
    /// Used when a publish request names no publisher.
    pub publisher_name: String,
    pub default_page_limit: u32,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        desk: Arc<ReportDesk>,
        publisher_name: impl Into<String>,
        default_page_limit: u32,
    ) -> Self {
        Self {
            desk,
            publisher_name: publisher_name.into(),
            default_page_limit,
            started_at: Utc::now(),
        }
    }
}

#[derive(Deserialize)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub pagination: Option<PaginationInfo>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            pagination: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data)
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            pagination: None,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct PaginationInfo {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    pub pages: u32,
}

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: i64,
}

#[derive(Deserialize)]
pub struct CreateReportRequest {
    pub sport: String,
    #[serde(default)]
    pub performance: Option<SystemPerformance>,
}

#[derive(Deserialize)]
pub struct PublishRequest {
    pub published_by: Option<String>,
}

#[derive(Deserialize)]
pub struct OutcomeRequest {
    pub outcome: PickOutcome,
}

#[derive(Deserialize)]
pub struct CorrectionRequest {
    pub outcome: PickOutcome,
    pub reason: String,
    pub corrected_by: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct DeleteResponse {
    pub report_id: Uuid,
    pub removed_children: usize,
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Health
        .route("/health", get(health_check))

        // Report lifecycle
        .route("/api/v1/reports", post(create_report))
        .route("/api/v1/reports/:id", get(get_report).delete(delete_report))
        .route("/api/v1/reports/:id/publish", post(publish_report))
        .route("/api/v1/reports/:id/unpublish", post(unpublish_report))

        // Report children
        .route("/api/v1/reports/:id/picks", get(list_picks).post(attach_pick))
        .route("/api/v1/reports/:id/injuries", get(list_injuries).post(attach_injury))
        .route(
            "/api/v1/reports/:id/intelligence",
            get(fresh_intelligence).post(attach_intelligence),
        )
        .route("/api/v1/reports/:id/line-movements", post(attach_line_movement))

        // Performance
        .route("/api/v1/reports/:id/performance", get(get_performance).post(recompute_performance))
        .route("/api/v1/reports/:id/corrections", get(list_corrections))

        // Subscriber view
        .route("/api/v1/reports/:id/client-picks", get(report_client_picks))
        .route("/api/v1/sports/:sport/client-picks", get(sport_client_picks))
        .route("/api/v1/sports/:sport/reports", get(list_sport_reports))

        // Picks
        .route("/api/v1/picks/:id", get(get_pick).patch(update_pick))
        .route("/api/v1/picks/:id/props", post(attach_player_prop))
        .route("/api/v1/picks/:id/outcome", post(record_outcome))
        .route("/api/v1/picks/:id/correction", post(correct_outcome))
        .route("/api/v1/picks/:id/line-history", get(line_history))
        .route("/api/v1/props/:id/outcome", post(record_prop_outcome))
        .route("/api/v1/props/:id/correction", post(correct_prop_outcome))

        // Injuries and intelligence
        .route("/api/v1/injuries/:id/links/:pick_id", post(link_injury))
        .route("/api/v1/intelligence/:id/acknowledge", post(acknowledge_intelligence))
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let now = Utc::now();
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: now.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: (now - state.started_at).num_seconds(),
    })
}

async fn create_report(
    State(state): State<AppState>,
    Json(request): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Report>>), ApiError> {
    let report = state.desk.create_report(&request.sport, request.performance)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(report))))
}

async fn get_report(Path(id): Path<Uuid>, State(state): State<AppState>) -> ApiResult<Report> {
    Ok(Json(ApiResponse::ok(state.desk.report(id)?)))
}

async fn delete_report(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> ApiResult<DeleteResponse> {
    let removed_children = state.desk.delete_report(id)?;
    Ok(Json(ApiResponse::ok(DeleteResponse {
        report_id: id,
        removed_children,
    })))
}

async fn publish_report(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    body: Option<Json<PublishRequest>>,
) -> ApiResult<Report> {
    let published_by = body
        .and_then(|Json(request)| request.published_by)
        .unwrap_or_else(|| state.publisher_name.clone());

    let report = state.desk.publish(id, &published_by)?;
    let message = format!("{} report is live", report.sport);
    Ok(Json(ApiResponse::with_message(report, message)))
}

async fn unpublish_report(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> ApiResult<Report> {
    Ok(Json(ApiResponse::ok(state.desk.unpublish(id)?)))
}

async fn list_picks(Path(id): Path<Uuid>, State(state): State<AppState>) -> ApiResult<Vec<Pick>> {
    Ok(Json(ApiResponse::ok(state.desk.picks(id)?)))
}

async fn attach_pick(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(new_pick): Json<NewPick>,
) -> Result<(StatusCode, Json<ApiResponse<Pick>>), ApiError> {
    let pick = state.desk.attach_pick(id, new_pick)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(pick))))
}

async fn list_injuries(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> ApiResult<Vec<InjuryUpdate>> {
    Ok(Json(ApiResponse::ok(state.desk.injuries(id)?)))
}

async fn attach_injury(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(new_injury): Json<NewInjury>,
) -> Result<(StatusCode, Json<ApiResponse<InjuryUpdate>>), ApiError> {
    let injury = state.desk.attach_injury(id, new_injury)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(injury))))
}

async fn fresh_intelligence(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> ApiResult<Vec<IntelligenceUpdate>> {
    Ok(Json(ApiResponse::ok(state.desk.fresh_intelligence(id)?)))
}

async fn attach_intelligence(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(new_update): Json<NewIntelligence>,
) -> Result<(StatusCode, Json<ApiResponse<IntelligenceUpdate>>), ApiError> {
    let update = state.desk.attach_intelligence(id, new_update)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(update))))
}

async fn attach_line_movement(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(movement): Json<NewLineMovement>,
) -> Result<(StatusCode, Json<ApiResponse<LineMovement>>), ApiError> {
    let movement = state.desk.attach_line_movement(id, movement)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(movement))))
}

async fn get_performance(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> ApiResult<Option<SystemPerformance>> {
    Ok(Json(ApiResponse::ok(state.desk.report(id)?.performance)))
}

async fn recompute_performance(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> ApiResult<SystemPerformance> {
    let performance = state.desk.recompute_report_performance(id)?;
    let message = format!("{} ({})", performance.record, performance.win_rate_display());
    Ok(Json(ApiResponse::with_message(performance, message)))
}

async fn list_corrections(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> ApiResult<Vec<OutcomeCorrection>> {
    Ok(Json(ApiResponse::ok(state.desk.corrections(id)?)))
}

async fn report_client_picks(
    Path(id): Path<Uuid>,
    Query(filter): Query<ClientPickFilter>,
    State(state): State<AppState>,
) -> ApiResult<Vec<ClientPick>> {
    Ok(Json(ApiResponse::ok(state.desk.to_client_picks(id, &filter)?)))
}

async fn sport_client_picks(
    Path(sport): Path<String>,
    Query(filter): Query<ClientPickFilter>,
    State(state): State<AppState>,
) -> ApiResult<Vec<ClientPick>> {
    let sport: Sport = sport.parse()?;
    Ok(Json(ApiResponse::ok(state.desk.client_picks_for_sport(sport, &filter)?)))
}

// Newest reports first
async fn list_sport_reports(
    Path(sport): Path<String>,
    Query(params): Query<PaginationParams>,
    State(state): State<AppState>,
) -> ApiResult<Vec<Report>> {
    let sport: Sport = sport.parse()?;
    let page = params.page.unwrap_or(1).max(1);
    let limit = params
        .limit
        .unwrap_or(state.default_page_limit)
        .clamp(1, MAX_PAGE_LIMIT);

    let mut reports = state.desk.reports_for(sport);
    reports.sort_by(|a, b| b.generated_at.cmp(&a.generated_at).then_with(|| a.id.cmp(&b.id)));

    let total = reports.len() as u32;
    let offset = u64::from(page - 1).saturating_mul(u64::from(limit));
    let page_reports: Vec<Report> = reports
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(limit as usize)
        .collect();

    Ok(Json(ApiResponse {
        success: true,
        data: Some(page_reports),
        message: None,
        pagination: Some(PaginationInfo {
            page,
            limit,
            total,
            pages: (total + limit - 1) / limit,
        }),
    }))
}

async fn get_pick(Path(id): Path<Uuid>, State(state): State<AppState>) -> ApiResult<Pick> {
    Ok(Json(ApiResponse::ok(state.desk.pick(id)?)))
}

async fn update_pick(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(patch): Json<PickPatch>,
) -> ApiResult<Pick> {
    Ok(Json(ApiResponse::ok(state.desk.update_pick(id, patch)?)))
}

async fn attach_player_prop(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(new_prop): Json<NewPlayerProp>,
) -> Result<(StatusCode, Json<ApiResponse<PlayerProp>>), ApiError> {
    let prop = state.desk.attach_player_prop(id, new_prop)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(prop))))
}

async fn record_outcome(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<OutcomeRequest>,
) -> ApiResult<Pick> {
    Ok(Json(ApiResponse::ok(state.desk.record_outcome(id, request.outcome)?)))
}

async fn correct_outcome(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<CorrectionRequest>,
) -> ApiResult<Pick> {
    let corrected_by = request
        .corrected_by
        .unwrap_or_else(|| state.publisher_name.clone());
    let pick = state
        .desk
        .correct_outcome(id, request.outcome, &request.reason, &corrected_by)?;
    Ok(Json(ApiResponse::ok(pick)))
}

async fn line_history(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> ApiResult<Vec<LineMovement>> {
    Ok(Json(ApiResponse::ok(state.desk.line_history(id)?)))
}

async fn record_prop_outcome(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<OutcomeRequest>,
) -> ApiResult<PlayerProp> {
    Ok(Json(ApiResponse::ok(state.desk.record_prop_outcome(id, request.outcome)?)))
}

async fn correct_prop_outcome(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<CorrectionRequest>,
) -> ApiResult<PlayerProp> {
    let corrected_by = request
        .corrected_by
        .unwrap_or_else(|| state.publisher_name.clone());
    let prop = state
        .desk
        .correct_prop_outcome(id, request.outcome, &request.reason, &corrected_by)?;
    Ok(Json(ApiResponse::ok(prop)))
}

async fn link_injury(
    Path((id, pick_id)): Path<(Uuid, Uuid)>,
    State(state): State<AppState>,
) -> ApiResult<InjuryUpdate> {
    Ok(Json(ApiResponse::ok(state.desk.link_injury_to_pick(id, pick_id)?)))
}

async fn acknowledge_intelligence(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> ApiResult<IntelligenceUpdate> {
    Ok(Json(ApiResponse::ok(state.desk.acknowledge_intelligence(id)?)))
}
