//! Domain data model and upstream shims for `inkboard`.
//!
//! The crate owns the already-fetched inputs of a board render: an ordered
//! news-entry sequence and a weather report. Layout lives in
//! `inkboard-render`; pixel output lives in `inkboard-embedded-graphics`.

#![cfg_attr(
    not(test),
    deny(
        clippy::disallowed_methods,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

pub mod feed;
pub mod weather;

pub use feed::{parse_feed, FeedEntry, FeedError};
pub use weather::{
    parse_current, parse_forecast, ForecastEntry, WeatherError, WeatherReport, WeatherSnapshot,
};
