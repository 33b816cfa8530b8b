//! Market data models
//!
//! - `bar` - Daily price bar returned by providers, and the field selector
//!   used to pick one number out of it

mod bar;

pub use bar::{DailyBar, PriceField};
