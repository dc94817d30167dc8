use crate::infra::{deserialize_optional_date, today_or_local, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use talent_pulse::config::DashboardConfig;
use talent_pulse::error::AppError;
use talent_pulse::evaluations::{
    category_averages, compare_within, expected_average, filter_by_period, gap_analysis,
    individual_report, person_trajectories_within, select, skill_breakdown, skill_deltas,
    transform_to_skill_points, trend_by_bucket, CategoryAverages, ComparisonScheme,
    ComparisonWindows, CompositeSkillPoint, EvaluationRecord, ExpectationProfile,
    ExpectedSkillEntry, ExpectedSkillTable, IndividualReport, PeriodToken, PersonId, Scope,
    SeniorityAssessment, SeniorityBand, SkillBreakdown, TrendGranularity,
};
use talent_pulse::evaluations::projection::{
    comet_rows, comparison_bars, gap_bars, radar_rows, trend_rows, CometRow, ComparisonBar,
    GapBar, RadarRow, TrendRow,
};

/// Record slice and selection shared by every dashboard request.
#[derive(Debug, Deserialize)]
pub(crate) struct DashboardFilter {
    pub(crate) records: Vec<EvaluationRecord>,
    #[serde(default)]
    pub(crate) scope: Scope,
    #[serde(default)]
    pub(crate) period: Option<PeriodToken>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) label_width: Option<usize>,
}

/// Expected-skill lookup inputs. Without a band every expectation reads as
/// "not defined".
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExpectationParams {
    #[serde(default)]
    pub(crate) expected_skills: Vec<ExpectedSkillEntry>,
    #[serde(default)]
    pub(crate) expected_band: Option<SeniorityBand>,
    #[serde(default)]
    pub(crate) role: String,
    #[serde(default)]
    pub(crate) area: String,
}

impl ExpectationParams {
    fn skill_points(&self, records: &[EvaluationRecord]) -> Vec<CompositeSkillPoint> {
        let table = match self.expected_band {
            Some(_) => ExpectedSkillTable::from_entries(self.expected_skills.iter().cloned()),
            None => ExpectedSkillTable::default(),
        };
        let band = self.expected_band.unwrap_or(SeniorityBand::Trainee);
        transform_to_skill_points(records, &table, band, self.role.trim(), self.area.trim())
    }
}

struct Selection {
    records: Vec<EvaluationRecord>,
    today: NaiveDate,
    period: PeriodToken,
    label_width: usize,
}

impl Selection {
    fn in_period(&self) -> Vec<EvaluationRecord> {
        filter_by_period(&self.records, self.period, self.today).into_owned()
    }
}

impl DashboardFilter {
    fn resolve(self, config: &DashboardConfig) -> Result<Selection, AppError> {
        let label_width = self.label_width.unwrap_or(config.label_width);
        if label_width == 0 {
            return Err(AppError::Request(
                "label_width must be greater than zero".to_string(),
            ));
        }

        let records: Vec<EvaluationRecord> = self
            .records
            .into_iter()
            .map(EvaluationRecord::trimmed)
            .collect();
        let records = select(&records, &self.scope).into_owned();

        Ok(Selection {
            records,
            today: today_or_local(self.today),
            period: self.period.unwrap_or(config.default_period),
            label_width,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RadarRequest {
    #[serde(flatten)]
    pub(crate) filter: DashboardFilter,
    #[serde(flatten)]
    pub(crate) expectation: ExpectationParams,
}

#[derive(Debug, Serialize)]
pub(crate) struct RadarResponse {
    pub(crate) today: NaiveDate,
    pub(crate) period: String,
    pub(crate) record_count: usize,
    pub(crate) rows: Vec<RadarRow>,
    pub(crate) categories: CategoryAverages,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) assessment: Option<SeniorityAssessment>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrendRequest {
    #[serde(flatten)]
    pub(crate) filter: DashboardFilter,
    #[serde(flatten)]
    pub(crate) expectation: ExpectationParams,
    #[serde(default)]
    pub(crate) granularity: Option<TrendGranularity>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TrendResponse {
    pub(crate) today: NaiveDate,
    pub(crate) period: String,
    pub(crate) granularity: TrendGranularity,
    pub(crate) rows: Vec<TrendRow>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ComparisonRequest {
    #[serde(flatten)]
    pub(crate) filter: DashboardFilter,
    #[serde(default)]
    pub(crate) scheme: Option<ComparisonScheme>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ComparisonResponse {
    pub(crate) today: NaiveDate,
    pub(crate) scheme: ComparisonScheme,
    pub(crate) scheme_label: &'static str,
    pub(crate) windows: ComparisonWindows,
    pub(crate) bars: Vec<ComparisonBar>,
    pub(crate) breakdown: SkillBreakdown,
}

#[derive(Debug, Serialize)]
pub(crate) struct TrajectoriesResponse {
    pub(crate) today: NaiveDate,
    pub(crate) scheme: ComparisonScheme,
    pub(crate) scheme_label: &'static str,
    pub(crate) windows: ComparisonWindows,
    pub(crate) level_jumps: usize,
    pub(crate) comets: Vec<CometRow>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GapsResponse {
    pub(crate) today: NaiveDate,
    pub(crate) period: String,
    pub(crate) gaps: Vec<GapBar>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IndividualRequest {
    #[serde(flatten)]
    pub(crate) filter: DashboardFilter,
    #[serde(flatten)]
    pub(crate) expectation: ExpectationParams,
    pub(crate) subject_id: PersonId,
}

pub(crate) fn dashboard_router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/dashboard/radar", post(radar_endpoint))
        .route("/api/v1/dashboard/trend", post(trend_endpoint))
        .route("/api/v1/dashboard/comparison", post(comparison_endpoint))
        .route(
            "/api/v1/dashboard/trajectories",
            post(trajectories_endpoint),
        )
        .route("/api/v1/dashboard/gaps", post(gaps_endpoint))
        .route("/api/v1/dashboard/individual", post(individual_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn radar_endpoint(
    Extension(config): Extension<DashboardConfig>,
    Json(payload): Json<RadarRequest>,
) -> Result<Json<RadarResponse>, AppError> {
    let RadarRequest {
        filter,
        expectation,
    } = payload;
    let selection = filter.resolve(&config)?;
    let records = selection.in_period();
    let points = expectation.skill_points(&records);

    Ok(Json(RadarResponse {
        today: selection.today,
        period: selection.period.label(),
        record_count: records.len(),
        rows: radar_rows(&points, selection.label_width),
        categories: category_averages(&points),
        assessment: expectation
            .expected_band
            .map(|band| SeniorityAssessment::assess(&points, band)),
    }))
}

pub(crate) async fn trend_endpoint(
    Extension(config): Extension<DashboardConfig>,
    Json(payload): Json<TrendRequest>,
) -> Result<Json<TrendResponse>, AppError> {
    let TrendRequest {
        filter,
        expectation,
        granularity,
    } = payload;
    let selection = filter.resolve(&config)?;
    let granularity = granularity.unwrap_or(TrendGranularity::Quarter);
    let records = selection.in_period();
    let expected = expected_average(&expectation.skill_points(&records));

    Ok(Json(TrendResponse {
        today: selection.today,
        period: selection.period.label(),
        granularity,
        rows: trend_rows(&trend_by_bucket(&records, granularity), expected),
    }))
}

fn windows_for(scheme: ComparisonScheme, today: NaiveDate) -> Result<ComparisonWindows, AppError> {
    scheme
        .windows(today)
        .ok_or_else(|| AppError::Request(format!("no comparison windows exist for {today}")))
}

pub(crate) async fn comparison_endpoint(
    Extension(config): Extension<DashboardConfig>,
    Json(payload): Json<ComparisonRequest>,
) -> Result<Json<ComparisonResponse>, AppError> {
    let selection = payload.filter.resolve(&config)?;
    let scheme = payload.scheme.unwrap_or(ComparisonScheme::CalendarQuarter);
    let windows = windows_for(scheme, selection.today)?;
    let deltas = skill_deltas(&compare_within(&selection.records, &windows));

    Ok(Json(ComparisonResponse {
        today: selection.today,
        scheme,
        scheme_label: scheme.label(),
        windows,
        bars: comparison_bars(&deltas, selection.label_width),
        breakdown: skill_breakdown(&deltas),
    }))
}

pub(crate) async fn trajectories_endpoint(
    Extension(config): Extension<DashboardConfig>,
    Json(payload): Json<ComparisonRequest>,
) -> Result<Json<TrajectoriesResponse>, AppError> {
    let selection = payload.filter.resolve(&config)?;
    let scheme = payload
        .scheme
        .unwrap_or(ComparisonScheme::RollingThreeMonths);
    let windows = windows_for(scheme, selection.today)?;
    let trajectories = person_trajectories_within(&selection.records, &windows);

    Ok(Json(TrajectoriesResponse {
        today: selection.today,
        scheme,
        scheme_label: scheme.label(),
        windows,
        level_jumps: trajectories
            .iter()
            .filter(|trajectory| trajectory.level_jump)
            .count(),
        comets: comet_rows(&trajectories, selection.label_width),
    }))
}

pub(crate) async fn gaps_endpoint(
    Extension(config): Extension<DashboardConfig>,
    Json(payload): Json<DashboardFilter>,
) -> Result<Json<GapsResponse>, AppError> {
    let selection = payload.resolve(&config)?;
    let records = selection.in_period();

    Ok(Json(GapsResponse {
        today: selection.today,
        period: selection.period.label(),
        gaps: gap_bars(&gap_analysis(&records), selection.label_width),
    }))
}

pub(crate) async fn individual_endpoint(
    Extension(config): Extension<DashboardConfig>,
    Json(payload): Json<IndividualRequest>,
) -> Result<Json<IndividualReport>, AppError> {
    let IndividualRequest {
        filter,
        expectation,
        subject_id,
    } = payload;
    let band = expectation.expected_band.ok_or_else(|| {
        AppError::Request("expected_band is required for the individual dashboard".to_string())
    })?;
    let selection = filter.resolve(&config)?;
    let table = ExpectedSkillTable::from_entries(expectation.expected_skills.iter().cloned());
    let profile = ExpectationProfile {
        table: &table,
        band,
        role: expectation.role.trim(),
        area: expectation.area.trim(),
    };

    Ok(Json(individual_report(
        &selection.records,
        &subject_id,
        &profile,
        selection.period,
        selection.today,
        selection.label_width,
    )))
}
