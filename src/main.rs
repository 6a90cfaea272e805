use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::info;

use snapdeal_scrape::browser::live::BrowserSession;
use snapdeal_scrape::export::save_csv;
use snapdeal_scrape::{Profile, ScrapeConfig, Scraper, logging};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProfileArg {
    Basic,
    Rich,
}

impl From<ProfileArg> for Profile {
    fn from(p: ProfileArg) -> Self {
        match p {
            ProfileArg::Basic => Profile::Basic,
            ProfileArg::Rich => Profile::Rich,
        }
    }
}

/// Scrape Snapdeal search listings into a CSV file
#[derive(Parser, Debug)]
#[command(name = "snapdeal_scrape")]
struct Args {
    /// basic: first page of each section, listing fields only.
    /// rich: subcategories, pagination and product pages.
    #[arg(long, value_enum, default_value = "rich")]
    profile: ProfileArg,

    /// TOML file overriding profile defaults (ignored if missing)
    #[arg(short, long, default_value = "scrape.toml")]
    config: PathBuf,

    /// Output CSV path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Skip product pages
    #[arg(long)]
    no_deep: bool,

    /// Pages per subcategory
    #[arg(long)]
    max_pages: Option<u32>,

    /// Cards per page
    #[arg(long)]
    max_cards: Option<usize>,

    /// chromedriver endpoint
    #[arg(long)]
    webdriver: Option<String>,

    /// Debug logging for this crate
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn apply(&self, config: &mut ScrapeConfig) {
        if let Some(out) = &self.output {
            config.output = out.clone();
        }
        if self.headed {
            config.headless = false;
        }
        if self.no_deep {
            config.deep_scrape = false;
        }
        if let Some(n) = self.max_pages {
            config.max_pages_per_subcategory = n;
        }
        if self.max_cards.is_some() {
            config.max_cards_per_page = self.max_cards;
        }
        if let Some(url) = &self.webdriver {
            config.webdriver_url = url.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut config = ScrapeConfig::load(args.profile.into(), Some(args.config.as_path()))?;
    args.apply(&mut config);

    println!("🛒 Snapdeal Scraper\n");
    println!("{}", "=".repeat(60));

    let session = BrowserSession::start(&config).await?;
    let (records, summary) = Scraper::new(&session, &config).run().await;
    session.quit().await;

    save_csv(&config.output, &records, config.columns)?;

    println!("\n{}", "=".repeat(60));
    println!("📊 SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Sections:       {}", summary.sections);
    println!("Subcategories:  {}", summary.subcategories);
    println!("Pages:          {}", summary.pages);
    println!("Blocked pages:  {}", summary.blocked_pages);
    println!("Rows:           {}  →  {}", summary.records, config.output.display());
    info!(rows = summary.records, "done");
    Ok(())
}
