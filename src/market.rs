//! # Market Data Containers
//!
//! $$
//! r_t = \frac{p_t - p_{t-1}}{p_{t-1}}
//! $$
//!
//! Price-history containers and return-series construction.

pub mod price_table;
pub mod returns;

pub use price_table::sanitize_tickers;
pub use price_table::PriceTable;
pub use returns::ReturnMatrix;
