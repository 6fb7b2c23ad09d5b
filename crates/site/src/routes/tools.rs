//! Calculator endpoints backing the site widgets.

use axum::Json;
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use loanmitra_core::types::emi;
use loanmitra_core::EmiQuote;

use crate::error::{AppError, Result};

#[derive(Deserialize)]
pub struct EmiRequest {
    pub principal: Decimal,
    pub annual_rate_percent: Decimal,
    pub tenure_months: u32,
}

/// Compute the fixed monthly installment for a loan.
pub async fn emi(Json(req): Json<EmiRequest>) -> Result<Json<EmiQuote>> {
    let quote = emi::quote(req.principal, req.annual_rate_percent, req.tenure_months)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(Json(quote))
}

#[derive(Deserialize)]
pub struct CreditScoreRequest {
    pub pan: String,
}

#[derive(Serialize)]
pub struct CreditScoreResponse {
    pub score: u16,
    pub indicative: bool,
}

/// Indicative credit-score estimate.
///
/// Not wired to a bureau: returns a bounded random score in the healthy
/// band, flagged `indicative` so the widget labels it as an estimate.
pub async fn credit_score(
    Json(req): Json<CreditScoreRequest>,
) -> Result<Json<CreditScoreResponse>> {
    let pan = req.pan.trim();
    if pan.len() != 10 || !pan.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::BadRequest("invalid PAN".to_string()));
    }

    let score = rand::rng().random_range(650..=800);
    Ok(Json(CreditScoreResponse {
        score,
        indicative: true,
    }))
}
