//! Templine TUI — terminal player for the historical temperature series.
//!
//! Layout:
//! - Summary column: load state, metadata, first points, current year, Play/Pause
//! - Chart: anomaly line with the played part and the current year highlighted
//! - Status bar: key hints, load status, last message

pub mod app;
pub mod input;
pub mod theme;
pub mod ui;
pub mod worker;

pub use app::AppState;
