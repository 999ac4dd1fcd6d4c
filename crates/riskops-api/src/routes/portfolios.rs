//! Portfolio endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::dto::{CreatePortfolioRequest, PortfolioListResponse, PortfolioResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// List all portfolios.
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<PortfolioListResponse>> {
    let portfolios: Vec<PortfolioResponse> = state
        .run(|engine| Ok(engine.list_portfolios()?))
        .await?
        .into_iter()
        .map(PortfolioResponse::from)
        .collect();
    let count = portfolios.len();

    Ok(Json(PortfolioListResponse { portfolios, count }))
}

/// Get a portfolio and its positions.
pub async fn get(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<PortfolioResponse>> {
    let portfolio = state.run(move |engine| Ok(engine.portfolio(&name)?)).await?;
    Ok(Json(portfolio.into()))
}

/// Create or replace a portfolio.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreatePortfolioRequest>,
) -> ApiResult<(StatusCode, Json<PortfolioResponse>)> {
    let record = req.into_record()?;
    let stored = state
        .run(move |engine| Ok(engine.create_portfolio(record)?))
        .await?;

    Ok((StatusCode::CREATED, Json(stored.into())))
}
