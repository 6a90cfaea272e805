use thiserror::Error;

/// A single page read failed. Never escapes a field.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("webdriver: {0}")]
    Driver(#[from] thirtyfour::error::WebDriverError),
    #[error("invalid selector `{0}`")]
    Selector(String),
    #[error("tab `{0}` is not open")]
    MissingTab(String),
    #[error("timed out after {0}s")]
    Timeout(u64),
}

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("could not start browser session at {url}: {source}")]
    Session {
        url: String,
        #[source]
        source: thirtyfour::error::WebDriverError,
    },
    #[error("configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
}
