use chrono::Local;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, time::FormatTime},
};

// same format as the `Scraped At` column
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

// RUST_LOG wins over `verbose`
pub fn init(verbose: bool) {
    let default = if verbose { "snapdeal_scrape=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(LocalTime)
        .with_target(false)
        .try_init();
}
