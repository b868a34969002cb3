pub mod banking;
pub mod compliance;
pub mod health;
pub mod pools;
pub mod routes;

pub use banking::*;
pub use compliance::*;
pub use health::*;
pub use pools::*;
pub use routes::*;

use crate::api::error::{ApiError, ApiResult};

/// Required `year` query parameter.
pub(crate) fn require_year(raw: Option<&str>) -> ApiResult<i32> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Err(ApiError::bad_request("Missing required query parameter: year")),
        Some(s) => parse_year(s),
    }
}

pub(crate) fn parse_year(raw: &str) -> ApiResult<i32> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ApiError::bad_request("Invalid year parameter. Must be a number."))
}
