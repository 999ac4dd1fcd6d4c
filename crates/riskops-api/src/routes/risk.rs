//! Risk endpoints.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::dto::{LatestQuery, RiskCalcRequest, RiskCalcResponse, RiskLatestResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// Compute historical VaR/CVaR for a portfolio.
pub async fn calculate(
    State(state): State<AppState>,
    Json(req): Json<RiskCalcRequest>,
) -> ApiResult<Json<RiskCalcResponse>> {
    let request = req.into_engine_request(&state.model_version)?;
    let report = state
        .run(move |engine| Ok(engine.calculate(&request)?))
        .await?;

    Ok(Json(report.into()))
}

/// Latest stored result for a portfolio.
pub async fn latest(
    State(state): State<AppState>,
    Query(query): Query<LatestQuery>,
) -> ApiResult<Json<RiskLatestResponse>> {
    let portfolio = query.portfolio;
    let name = portfolio.clone();
    let record = state.run(move |engine| Ok(engine.latest(&name)?)).await?;

    Ok(Json(RiskLatestResponse::new(portfolio, record)))
}
