// Section -> subcategory -> page -> card, strictly one at a time.

use chrono::Local;
use tracing::{debug, info, warn};

use crate::browser::Page;
use crate::config::{ScrapeConfig, Section};
use crate::detail::{DetailFields, DetailOptions, deep_scrape};
use crate::listing::{ListingCard, scan_page};
use crate::normalize::brand_from_name;
use crate::pagination::{PageTurn, next_page};
use crate::record::ProductRecord;
use crate::selectors::Selectors;
use crate::subcategory::{self, Rules, Subcategory};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sections: usize,
    pub subcategories: usize,
    pub pages: usize,
    pub blocked_pages: usize,
    pub records: usize,
}

pub struct Scraper<'a, P: Page> {
    page: &'a P,
    config: &'a ScrapeConfig,
    selectors: &'a Selectors,
}

impl<'a, P: Page> Scraper<'a, P> {
    pub fn new(page: &'a P, config: &'a ScrapeConfig) -> Self {
        Self {
            page,
            config,
            selectors: Selectors::snapdeal(),
        }
    }

    // per-page trouble is logged and skipped; nothing here aborts the run
    pub async fn run(&self) -> (Vec<ProductRecord>, RunSummary) {
        let mut records = Vec::new();
        let mut summary = RunSummary::default();

        for section in &self.config.sections {
            info!(section = %section.label, "=== section ===");
            summary.sections += 1;
            self.open_listing(&section.url).await;

            let subcats = self.subcategories(section).await;
            info!(count = subcats.len(), "subcategories found");

            for sub in &subcats {
                summary.subcategories += 1;
                let before = records.len();
                self.scrape_subcategory(section, sub, &mut records, &mut summary).await;
                info!(
                    subcategory = %sub.label,
                    collected = records.len() - before,
                    "subcategory done"
                );
            }
        }

        summary.records = records.len();
        (records, summary)
    }

    async fn open_listing(&self, url: &str) {
        if let Err(e) = self.page.goto(url).await {
            warn!(url, "navigation failed: {e}");
            return;
        }
        let first_card = &self.selectors.cards[0];
        if !self.page.wait_for(first_card, self.config.listing_wait()).await {
            debug!(url, "listing did not settle before timeout");
        }
    }

    async fn subcategories(&self, section: &Section) -> Vec<Subcategory> {
        let found = if self.config.discover_subcategories {
            let rules = Rules::new(&self.config.site_domain, self.config.left_x_threshold, self.selectors);
            subcategory::discover(self.page, &rules).await
        } else {
            Vec::new()
        };
        subcategory::or_all(found, &section.url)
    }

    async fn scrape_subcategory(
        &self,
        section: &Section,
        sub: &Subcategory,
        records: &mut Vec<ProductRecord>,
        summary: &mut RunSummary,
    ) {
        info!(subcategory = %sub.label, url = %sub.url, "-> subcategory");
        self.open_listing(&sub.url).await;

        for page_num in 1..=self.config.max_pages_per_subcategory {
            info!(page = page_num, "page");
            summary.pages += 1;

            if self.config.scroll {
                if let Err(e) = self.page.scroll_to_bottom(self.config.scroll_pause()).await {
                    debug!("scroll failed: {e}");
                }
            }

            let Some(cards) = scan_page(
                self.page,
                self.selectors,
                self.config.max_cards_per_page,
                self.config.listing_rating,
            )
            .await
            else {
                summary.blocked_pages += 1;
                break;
            };
            if cards.is_empty() {
                info!("no products on this page");
                break;
            }

            for card in cards {
                let detail = self.detail_for(&card).await;
                records.push(build_record(section, sub, page_num, card, detail));
            }

            if page_num == self.config.max_pages_per_subcategory {
                break;
            }
            let turn = next_page(
                self.page,
                self.selectors,
                self.config.settle(),
                self.config.next_page_wait(),
            )
            .await;
            if turn == PageTurn::LastPage {
                info!("no next button or reached last page");
                break;
            }
        }
    }

    async fn detail_for(&self, card: &ListingCard) -> DetailFields {
        if !self.config.deep_scrape {
            return DetailFields::default();
        }
        let opts = DetailOptions {
            selectors: self.selectors,
            site_domain: &self.config.site_domain,
            wait: self.config.product_wait(),
        };
        deep_scrape(self.page, &card.product_url, &opts).await
    }
}

pub fn build_record(
    section: &Section,
    sub: &Subcategory,
    page: u32,
    card: ListingCard,
    detail: DetailFields,
) -> ProductRecord {
    let brand = if detail.brand.is_empty() {
        brand_from_name(&card.name)
    } else {
        detail.brand
    };

    ProductRecord {
        scraped_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        section: section.label.clone(),
        subcategory: sub.label.clone(),
        name: card.name,
        brand,
        price: card.price,
        original_price: card.original_price,
        discount: card.discount,
        rating_listing: card.rating,
        rating_detail: detail.rating,
        reviews_listing: card.reviews,
        reviews_detail: detail.reviews,
        audience: card.audience,
        availability: detail.availability,
        seller: detail.seller,
        product_url: card.product_url,
        image_url: card.image_url,
        detail_images: detail.images,
        short_description: card.short_description,
        full_description: detail.description,
        breadcrumb: detail.breadcrumb,
        page,
    }
}
