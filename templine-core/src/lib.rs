//! Templine Core — series types, data loading, and the playback state machine.
//!
//! This crate contains everything the front-ends share:
//! - Domain types (series metadata, yearly data points)
//! - Series providers (local HTTP API, GISTEMP CSV import) and the load status holder
//! - Playback controller with a pluggable repeating-timer scheduler
//! - TOML configuration and tracing setup

pub mod config;
pub mod data;
pub mod domain;
pub mod playback;
pub mod telemetry;

pub use config::{Config, ConfigError};
pub use data::{DataLoader, LoadError, LoadStatus, SeriesProvider, SeriesSource};
pub use domain::{DataPoint, HistoricalSeries, SeriesMeta};
pub use playback::{
    IntervalScheduler, PlaybackController, PlaybackEvent, PlaybackPhase, PlaybackState,
    PlaybackTiming, Scheduler, TimerId,
};
