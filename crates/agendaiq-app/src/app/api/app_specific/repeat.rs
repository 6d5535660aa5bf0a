//! Repeat-meeting endpoints backing the meeting form's repeat dialog.

use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use agendaiq_core::constants::REPEAT_ROUTE_COMPONENT;
use agendaiq_repeat::repeat::datetime::format_preview_date;
use agendaiq_repeat::repeat::{
    PayloadContext, RepeatConfigPayload, SeriesPlan, SeriesPreview, plan_payload, preview_payload,
    to_rrule,
};

use crate::config::get_config_from_depot;
use crate::error::AppError;

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// ## Summary
/// Preview request payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub start_date: Option<String>,
    pub config: RepeatConfigPayload,
}

/// ## Summary
/// Preview response payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    #[serde(flatten)]
    pub preview: SeriesPreview,
    /// `dates` rendered as "Mon, Jan 01, 2024".
    pub display_dates: Vec<String>,
}

/// ## Summary
/// Plan request payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub start_date: String,
    pub end_date: String,
    pub config: RepeatConfigPayload,
}

/// ## Summary
/// RRULE export request payload
#[derive(Debug, Deserialize)]
pub struct RRuleRequest {
    pub config: RepeatConfigPayload,
}

/// ## Summary
/// RRULE export response payload
#[derive(Debug, Serialize)]
pub struct RRuleResponse {
    pub rrule: String,
}

fn render_bad_body(res: &mut Response, err: &salvo::http::ParseError) {
    warn!(error = %err, "Failed to parse repeat request body");
    res.status_code(StatusCode::BAD_REQUEST);
    res.render(Json(ErrorResponse {
        error: "Invalid request body".to_string(),
    }));
}

fn render_app_error(res: &mut Response, err: &AppError) {
    let status = err.status_code();
    if status.is_server_error() {
        error!(error = %err, "Repeat request failed");
    } else {
        warn!(error = %err, "Rejected repeat request");
    }
    res.status_code(status);
    res.render(Json(ErrorResponse {
        error: err.to_string(),
    }));
}

/// ## Summary
/// POST /api/app/repeat/preview - Preview the dates a repeat configuration produces
///
/// A missing or malformed start date yields an empty date list, not an error.
///
/// ## Errors
/// Returns HTTP 400 for an unreadable body or a structurally invalid config.
/// Returns HTTP 500 if configuration is unavailable.
#[handler]
#[tracing::instrument(skip_all)]
pub async fn preview(req: &mut Request, depot: &Depot, res: &mut Response) {
    let request: PreviewRequest = match req.parse_json().await {
        Ok(r) => r,
        Err(e) => return render_bad_body(res, &e),
    };

    let settings = match get_config_from_depot(depot) {
        Ok(settings) => settings,
        Err(e) => return render_app_error(res, &e),
    };

    match preview_payload(request.start_date.as_deref(), &request.config, &settings.repeat) {
        Ok(series_preview) => {
            tracing::debug!(total = series_preview.total, "Built repeat preview");
            let display_dates = series_preview
                .dates
                .iter()
                .map(|date| format_preview_date(date.date()))
                .collect();
            res.render(Json(PreviewResponse {
                preview: series_preview,
                display_dates,
            }));
        }
        Err(e) => render_app_error(res, &AppError::from(e)),
    }
}

/// ## Summary
/// POST /api/app/repeat/plan - Expand a meeting into the slots of its series
///
/// ## Errors
/// Returns HTTP 400 for an unreadable body, unparseable meeting times, an
/// end before the start, or an invalid config.
/// Returns HTTP 500 if configuration is unavailable.
#[handler]
#[tracing::instrument(skip_all)]
pub async fn plan(req: &mut Request, depot: &Depot, res: &mut Response) {
    let request: PlanRequest = match req.parse_json().await {
        Ok(r) => r,
        Err(e) => return render_bad_body(res, &e),
    };

    let settings = match get_config_from_depot(depot) {
        Ok(settings) => settings,
        Err(e) => return render_app_error(res, &e),
    };

    let result: Result<SeriesPlan, AppError> = plan_payload(
        &request.start_date,
        &request.end_date,
        &request.config,
        &settings.repeat,
    )
    .map_err(AppError::from);

    match result {
        Ok(series_plan) => res.render(Json(series_plan)),
        Err(e) => render_app_error(res, &e),
    }
}

/// ## Summary
/// POST /api/app/repeat/rrule - Export a repeat configuration as an RRULE
///
/// ## Errors
/// Returns HTTP 400 for an unreadable body or an invalid config.
/// Returns HTTP 500 if configuration is unavailable.
#[handler]
#[tracing::instrument(skip_all)]
pub async fn rrule(req: &mut Request, depot: &Depot, res: &mut Response) {
    let request: RRuleRequest = match req.parse_json().await {
        Ok(r) => r,
        Err(e) => return render_bad_body(res, &e),
    };

    let settings = match get_config_from_depot(depot) {
        Ok(settings) => settings,
        Err(e) => return render_app_error(res, &e),
    };

    let rendered = PayloadContext::from_settings(&settings.repeat)
        .and_then(|ctx| request.config.to_config(&ctx))
        .and_then(|config| to_rrule(&config));

    match rendered {
        Ok(rendered_rrule) => res.render(Json(RRuleResponse { rrule: rendered_rrule })),
        Err(e) => render_app_error(res, &AppError::from(e)),
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(REPEAT_ROUTE_COMPONENT)
        .push(Router::with_path("preview").post(preview))
        .push(Router::with_path("plan").post(plan))
        .push(Router::with_path("rrule").post(rrule))
}
