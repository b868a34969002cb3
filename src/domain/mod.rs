pub mod banking;
pub mod compliance;
pub mod pool;
pub mod route;

pub use banking::*;
pub use compliance::*;
pub use pool::*;
pub use route::*;

use rust_decimal::{Decimal, RoundingStrategy};

/// Round a balance to 2 dp, half away from zero (12.345 -> 12.35).
pub fn round_cb(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
