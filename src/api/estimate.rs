//! Swap estimate endpoint
//!
//! `GET /estimate?pool=..&src=..&dst=..&src_amount=..` returns the expected
//! output amount as a decimal string. Addresses and the amount are validated
//! here; the service only ever sees well-formed inputs.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::ApiState;
use crate::error::EstimateError;
use crate::math::U256;
use crate::types::Address;

/// Query parameters for an estimate request
#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    pub pool: Option<String>,
    pub src: Option<String>,
    pub dst: Option<String>,
    pub src_amount: Option<String>,
}

/// Estimate response body
#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub amount_out: String,
}

/// Handle a swap estimate request
pub async fn estimate_handler(
    State(state): State<ApiState>,
    Query(params): Query<EstimateRequest>,
) -> Response {
    debug!("estimate request: {:?}", params);

    let pool = match parse_address(params.pool.as_deref(), "pool") {
        Ok(addr) => addr,
        Err(response) => return response,
    };
    let src = match parse_address(params.src.as_deref(), "src") {
        Ok(addr) => addr,
        Err(response) => return response,
    };
    let dst = match parse_address(params.dst.as_deref(), "dst") {
        Ok(addr) => addr,
        Err(response) => return response,
    };
    let amount_in = match parse_amount(params.src_amount.as_deref()) {
        Ok(amount) => amount,
        Err(response) => return response,
    };

    match state.service.estimate(pool, src, dst, amount_in).await {
        Ok(amount_out) => Json(EstimateResponse {
            amount_out: amount_out.to_string(),
        })
        .into_response(),
        Err(err) => error_response(err),
    }
}

fn bad_request(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

fn parse_address(value: Option<&str>, field: &str) -> Result<Address, Response> {
    let value = match value {
        Some(v) if !v.is_empty() => v,
        _ => return Err(bad_request(format!("{field} address is required"))),
    };
    Address::from_hex(value).map_err(|_| bad_request(format!("invalid {field} address")))
}

fn parse_amount(value: Option<&str>) -> Result<U256, Response> {
    let value = match value {
        Some(v) if !v.is_empty() => v,
        _ => return Err(bad_request("src_amount is required".to_string())),
    };
    let amount = U256::from_dec_str(value)
        .map_err(|_| bad_request("invalid src_amount".to_string()))?;
    if amount.is_zero() {
        return Err(bad_request("src_amount must be positive".to_string()));
    }
    Ok(amount)
}

/// Map service errors to response statuses. Input classifications are 400s;
/// a failed chain read is the upstream's fault and maps to 502 with the
/// detail kept in the logs.
fn error_response(err: EstimateError) -> Response {
    match err {
        EstimateError::SameToken | EstimateError::PairMismatch | EstimateError::EmptyReserves => {
            bad_request(err.to_string())
        }
        EstimateError::ReadFailure(context) => {
            error!("storage read failed: {}", context);
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": "failed to read pool state" })),
            )
                .into_response()
        }
    }
}
