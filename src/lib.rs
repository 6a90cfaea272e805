pub mod browser;
pub mod config;
pub mod detail;
pub mod error;
pub mod export;
pub mod listing;
pub mod logging;
pub mod lookup;
pub mod normalize;
pub mod pagination;
pub mod pipeline;
pub mod record;
pub mod selectors;
pub mod subcategory;

pub use config::{Profile, ScrapeConfig, Section};
pub use error::{ReadError, ScrapeError};
pub use pipeline::{RunSummary, Scraper};
pub use record::{ColumnSet, ProductRecord};
