use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;
use crate::listing::RatingSource;
use crate::record::ColumnSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub label: String,
    pub url: String,
}

impl Section {
    fn new(label: &str, url: &str) -> Self {
        Self {
            label: label.to_string(),
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Basic,
    Rich,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub output: PathBuf,
    pub webdriver_url: String,
    pub headless: bool,

    pub listing_wait_secs: u64,
    pub product_wait_secs: u64,
    pub next_page_wait_secs: u64,
    pub settle_ms: u64,
    pub scroll_pause_ms: u64,

    pub scroll: bool,
    pub discover_subcategories: bool,
    pub deep_scrape: bool,
    pub max_pages_per_subcategory: u32,
    pub max_cards_per_page: Option<usize>,
    pub listing_rating: RatingSource,
    // anchors left of this x offset (px) count as sidebar links
    pub left_x_threshold: f64,
    // host fragment that marks on-site links and images
    pub site_domain: String,
    pub columns: ColumnSet,

    pub sections: Vec<Section>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self::rich()
    }
}

impl ScrapeConfig {
    pub fn rich() -> Self {
        Self {
            output: PathBuf::from("snapdeal_products.csv"),
            webdriver_url: "http://localhost:9515".into(),
            headless: true,
            listing_wait_secs: 10,
            product_wait_secs: 10,
            next_page_wait_secs: 6,
            settle_ms: 1200,
            scroll_pause_ms: 800,
            scroll: true,
            discover_subcategories: true,
            deep_scrape: true,
            max_pages_per_subcategory: 5,
            max_cards_per_page: None,
            listing_rating: RatingSource::TextOrStars,
            left_x_threshold: 420.0,
            site_domain: "snapdeal".into(),
            columns: ColumnSet::Rich,
            sections: vec![
                Section::new("Accessories", "https://www.snapdeal.com/search?keyword=accessories&sort=rlvncy"),
                Section::new("Footwear", "https://www.snapdeal.com/search?keyword=footwear&sort=rlvncy"),
                Section::new("Kids' Fashion", "https://www.snapdeal.com/search?keyword=kids%20fashion&sort=rlvncy"),
                Section::new("Men's Clothing", "https://www.snapdeal.com/search?keyword=men%20clothing&sort=rlvncy"),
                Section::new("Women's Clothing", "https://www.snapdeal.com/search?keyword=women%20clothing&sort=rlvncy"),
            ],
        }
    }

    pub fn basic() -> Self {
        Self {
            headless: false,
            scroll: false,
            discover_subcategories: false,
            deep_scrape: false,
            max_pages_per_subcategory: 1,
            max_cards_per_page: Some(10),
            listing_rating: RatingSource::Stars,
            columns: ColumnSet::Basic,
            sections: vec![
                Section::new("Accessories", "https://www.snapdeal.com/search?keyword=accessories"),
                Section::new("Footwear", "https://www.snapdeal.com/search?keyword=footwear"),
                Section::new("Men Clothing", "https://www.snapdeal.com/search?keyword=men%20clothing"),
                Section::new("Women Clothing", "https://www.snapdeal.com/search?keyword=women%20clothing"),
            ],
            ..Self::rich()
        }
    }

    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Basic => Self::basic(),
            Profile::Rich => Self::rich(),
        }
    }

    // a missing file is not an error
    pub fn load(profile: Profile, file: Option<&Path>) -> Result<Self, ScrapeError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::for_profile(profile))?);
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(false));
        }
        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn listing_wait(&self) -> Duration {
        Duration::from_secs(self.listing_wait_secs)
    }

    pub fn product_wait(&self) -> Duration {
        Duration::from_secs(self.product_wait_secs)
    }

    pub fn next_page_wait(&self) -> Duration {
        Duration::from_secs(self.next_page_wait_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn scroll_pause(&self) -> Duration {
        Duration::from_millis(self.scroll_pause_ms)
    }
}
