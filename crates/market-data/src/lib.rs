//! Fundamentals Market Data Crate
//!
//! This crate provides the provider side of the fundamentals cache: the
//! network calls that produce daily price bars for a symbol.
//!
//! # Overview
//!
//! The market data crate supports:
//! - A provider-agnostic [`PriceHistoryProvider`] trait
//! - A Yahoo Finance implementation ([`YahooProvider`])
//! - [`MarketDataError`], which separates "no data" from provider failures
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +----------------------+
//! |  fundamentals    | --> | PriceHistoryProvider |  (trait)
//! |  core (fetcher)  |     +----------------------+
//! +------------------+                |
//!                                     v
//!                          +----------------------+
//!                          |    YahooProvider     |
//!                          +----------------------+
//!                                     |
//!                                     v
//!                          +----------------------+
//!                          |      DailyBar        |  (one per trading day)
//!                          +----------------------+
//! ```
//!
//! Providers never cache. Caching, gap detection and negative caching live
//! in `fundamentals-core`.

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{DailyBar, PriceField};
pub use provider::yahoo::YahooProvider;
pub use provider::PriceHistoryProvider;
