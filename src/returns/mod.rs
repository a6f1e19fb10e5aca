//! returns — price validation and scaled log-returns.
//!
//! [`ReturnsProcessor`] is the single entry point from raw prices; the
//! resulting [`ReturnSeries`] is the only input type the volatility, tail
//! and risk layers accept, so their finiteness and length checks happen
//! here once.

pub mod series;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::series::{
    DEFAULT_MIN_OBSERVATIONS, DEFAULT_SCALE, PriceSeries, ReturnSeries, ReturnsProcessor,
};

pub mod prelude {
    pub use super::series::{PriceSeries, ReturnSeries, ReturnsProcessor};
}
