use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::aggregate::ClimateViews;
use crate::dashboard::Dashboard;
use crate::models::*;
use crate::render::page::{render_error_page, render_page};
use crate::render::{render_section, RenderedSection};
use crate::views::{select, InsightsFilter, Section, Variable};

// ============================================================
// Error Handling
// ============================================================

/// Request failures. Empty selections are not errors; they render as
/// placeholders inside a successful response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    /// The dataset failed to load at startup.
    #[error("{0}")]
    Unavailable(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Render as an HTML page for browser routes.
    fn into_page(self, active: Option<Section>) -> Response {
        match &self {
            Self::Unavailable(msg) => tracing::warn!("Serving load error page: {}", msg),
            _ => tracing::debug!("Page request rejected: {}", self),
        }
        (
            self.status(),
            Html(render_error_page(active, &self.to_string())),
        )
            .into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!("API request rejected: {}", self);
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

fn loaded(dashboard: &Dashboard) -> Result<&ClimateViews, ApiError> {
    dashboard
        .views()
        .map_err(|msg| ApiError::Unavailable(msg.to_string()))
}

// ============================================================
// Filters
// ============================================================

/// Query parameters of the Insights section. All optional; blanks are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub year: Option<String>,
    pub variable: Option<String>,
    pub season: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl FilterQuery {
    pub fn to_filter(&self) -> Result<InsightsFilter, ApiError> {
        let defaults = InsightsFilter::default();

        let year = non_blank(&self.year)
            .map(|raw| {
                raw.parse::<i32>()
                    .map_err(|_| ApiError::BadRequest(format!("Invalid year '{raw}'")))
            })
            .transpose()?;

        let variable = match non_blank(&self.variable) {
            Some(raw) => Variable::from_str(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("Invalid variable '{raw}'")))?,
            None => defaults.variable,
        };

        let season = match non_blank(&self.season) {
            Some(raw) => Season::from_str(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("Invalid season '{raw}'")))?,
            None => defaults.season,
        };

        Ok(InsightsFilter {
            year,
            variable,
            season,
        })
    }
}

fn parse_section(slug: &str) -> Result<Section, ApiError> {
    Section::from_str(slug).ok_or_else(|| ApiError::NotFound(format!("Unknown section '{slug}'")))
}

fn build_section(
    dashboard: &Dashboard,
    section: Section,
    query: &FilterQuery,
) -> Result<RenderedSection, ApiError> {
    let views = loaded(dashboard)?;
    let filter = query.to_filter()?;
    Ok(render_section(&select(views, section, &filter)))
}

// ============================================================
// Health
// ============================================================

pub async fn health(State(dashboard): State<Dashboard>) -> impl IntoResponse {
    match dashboard.views() {
        Ok(views) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "records": views.records,
                "first_year": views.years.first(),
                "last_year": views.years.last(),
            })),
        ),
        Err(message) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "error", "message": message })),
        ),
    }
}

// ============================================================
// Pages
// ============================================================

pub async fn index(State(dashboard): State<Dashboard>) -> Response {
    match build_section(&dashboard, Section::Problem, &FilterQuery::default()) {
        Ok(rendered) => Html(render_page(&rendered)).into_response(),
        Err(e) => e.into_page(Some(Section::Problem)),
    }
}

pub async fn section_page(
    State(dashboard): State<Dashboard>,
    Path(slug): Path<String>,
    Query(query): Query<FilterQuery>,
) -> Response {
    let section = match parse_section(&slug) {
        Ok(section) => section,
        Err(e) => return e.into_page(None),
    };
    match build_section(&dashboard, section, &query) {
        Ok(rendered) => Html(render_page(&rendered)).into_response(),
        Err(e) => e.into_page(Some(section)),
    }
}

// ============================================================
// JSON
// ============================================================

pub async fn get_section(
    State(dashboard): State<Dashboard>,
    Path(slug): Path<String>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<RenderedSection>, ApiError> {
    let section = parse_section(&slug)?;
    build_section(&dashboard, section, &query).map(Json)
}

pub async fn list_years(State(dashboard): State<Dashboard>) -> Result<Json<Vec<i32>>, ApiError> {
    Ok(Json(loaded(&dashboard)?.years.clone()))
}

pub async fn annual_view(
    State(dashboard): State<Dashboard>,
) -> Result<Json<Vec<AnnualPoint>>, ApiError> {
    Ok(Json(loaded(&dashboard)?.annual.clone()))
}

/// Monthly climatology together with the month-by-year heatmap grid.
pub async fn monthly_view(
    State(dashboard): State<Dashboard>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let views = loaded(&dashboard)?;
    Ok(Json(json!({
        "climatology": views.monthly,
        "grid": views.grid,
        "precipitation_distribution": views.precipitation_distribution,
    })))
}

pub async fn seasonal_view(
    State(dashboard): State<Dashboard>,
) -> Result<Json<SeasonalView>, ApiError> {
    Ok(Json(loaded(&dashboard)?.seasonal.clone()))
}

pub async fn decadal_view(
    State(dashboard): State<Dashboard>,
) -> Result<Json<DecadalView>, ApiError> {
    Ok(Json(loaded(&dashboard)?.decadal.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(year: &str, variable: &str, season: &str) -> FilterQuery {
        FilterQuery {
            year: Some(year.to_string()),
            variable: Some(variable.to_string()),
            season: Some(season.to_string()),
        }
    }

    #[test]
    fn empty_query_uses_defaults() {
        let filter = FilterQuery::default().to_filter().unwrap();
        assert_eq!(filter, InsightsFilter::default());
    }

    #[test]
    fn blank_values_are_ignored() {
        let filter = query(" ", "", "").to_filter().unwrap();
        assert_eq!(filter, InsightsFilter::default());
    }

    #[test]
    fn parses_all_fields() {
        let filter = query("2003", "Precipitation", "summer").to_filter().unwrap();
        assert_eq!(filter.year, Some(2003));
        assert_eq!(filter.variable, Variable::Precipitation);
        assert_eq!(filter.season, Season::Summer);
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(matches!(
            query("next", "", "").to_filter(),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            query("", "humidity", "").to_filter(),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            query("", "", "monsoon").to_filter(),
            Err(ApiError::BadRequest(_))
        ));
    }
}
