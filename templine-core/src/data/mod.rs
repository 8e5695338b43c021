//! Data loading: providers, CSV import, and the load status holder.

pub mod csv_import;
pub mod http;
pub mod loader;
pub mod provider;

pub use csv_import::CsvProvider;
pub use http::{HttpProvider, DEFAULT_ENDPOINT};
pub use loader::{DataLoader, LoadStatus};
pub use provider::{LoadError, SeriesProvider, SeriesSource};
