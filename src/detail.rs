use std::time::Duration;

use tracing::{debug, warn};

use crate::browser::{Locator, Node, Page};
use crate::error::ReadError;
use crate::lookup::{self, first_attr, first_text};
use crate::normalize::{first_int, rating_cell, rating_from_style};
use crate::selectors::{IMAGE_ATTRS, Selectors};

pub const IN_STOCK: &str = "In Stock";
const MAX_IMAGE_LIST: usize = 2000;

// Defaults are the "not scraped" values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailFields {
    pub brand: String,
    pub rating: String,
    pub reviews: u64,
    pub availability: String,
    pub seller: String,
    pub description: String,
    pub breadcrumb: String,
    pub images: String,
}

pub struct DetailOptions<'a> {
    pub selectors: &'a Selectors,
    pub site_domain: &'a str,
    pub wait: Duration,
}

/// Read `url` in an auxiliary tab. Whatever happens, every tab opened on the
/// way is closed and the listing tab is active again on return. Failures
/// keep what was read so far.
pub async fn deep_scrape<P: Page>(page: &P, url: &str, opts: &DetailOptions<'_>) -> DetailFields {
    let mut fields = DetailFields::default();
    if url.is_empty() {
        return fields;
    }

    let parent = match page.current_tab().await {
        Ok(tab) => tab,
        Err(e) => {
            debug!("cannot identify listing tab, skipping product page: {e}");
            return fields;
        }
    };
    let keep = match page.tabs().await {
        Ok(tabs) => tabs,
        Err(e) => {
            debug!("cannot list open tabs, skipping product page: {e}");
            return fields;
        }
    };

    if let Err(e) = read_in_tab(page, url, opts, &mut fields).await {
        debug!(url, "product page abandoned: {e}");
    }

    if let Err(e) = page.close_tabs(&parent, &keep).await {
        warn!(url, "could not return to listing tab: {e}");
    }
    fields
}

async fn read_in_tab<P: Page>(
    page: &P,
    url: &str,
    opts: &DetailOptions<'_>,
    fields: &mut DetailFields,
) -> Result<(), ReadError> {
    page.open_tab(url, opts.wait).await?;
    let doc = page.document().await?;
    read_detail(&doc, opts, fields).await;
    Ok(())
}

pub async fn read_detail<N: Node>(doc: &N, opts: &DetailOptions<'_>, fields: &mut DetailFields) {
    let sel = opts.selectors;

    fields.brand = first_text(doc, sel.brand).await.or_default();

    let rating = first_text(doc, sel.rating_value).await.non_empty();
    fields.rating = match rating.found() {
        Some(r) => r,
        None => {
            let style = first_attr(doc, sel.filled_stars, "style").await.or_default();
            rating_cell(rating_from_style(&style))
        }
    };

    fields.reviews = first_int(&first_text(doc, sel.review_count).await.or_default());

    let availability = first_text(doc, sel.availability).await.or_default();
    fields.availability = if availability.is_empty() {
        IN_STOCK.to_string()
    } else {
        availability
    };

    fields.seller = first_text(doc, sel.seller).await.or_default();
    fields.description = longest_text(doc, sel.description).await;
    fields.breadcrumb = breadcrumb(doc, sel).await;
    fields.images = detail_images(doc, opts).await;
}

// earlier candidate wins ties
async fn longest_text<N: Node>(doc: &N, candidates: &[Locator]) -> String {
    let mut best = String::new();
    for locator in candidates {
        let text = first_text(doc, std::slice::from_ref(locator)).await.or_default();
        if text.chars().count() > best.chars().count() {
            best = text;
        }
    }
    best
}

async fn breadcrumb<N: Node>(doc: &N, sel: &Selectors) -> String {
    let mut parts = Vec::new();
    for li in lookup::find_all(doc, &sel.breadcrumb).await {
        let text = lookup::text_of(&li).await;
        if !text.is_empty() {
            parts.push(text);
        }
    }
    parts.join(" > ")
}

async fn detail_images<N: Node>(doc: &N, opts: &DetailOptions<'_>) -> String {
    let mut urls = Vec::new();
    for img in lookup::find_all(doc, &opts.selectors.zoom_images).await {
        if let Some(src) = image_src(&img).await {
            urls.push(src);
        }
    }

    if urls.is_empty() {
        for img in lookup::find_all(doc, &Locator::Tag("img")).await {
            let src = img.attr("src").await.ok().flatten().unwrap_or_default();
            if src.contains(opts.site_domain) && (src.contains("images") || src.contains("img")) {
                urls.push(src);
            }
        }
    }
    image_list(urls)
}

async fn image_src<N: Node>(img: &N) -> Option<String> {
    for attr in IMAGE_ATTRS {
        if let Ok(Some(v)) = img.attr(attr).await {
            if !v.trim().is_empty() {
                return Some(v.trim().to_string());
            }
        }
    }
    None
}

pub fn image_list(urls: Vec<String>) -> String {
    let mut unique: Vec<String> = Vec::with_capacity(urls.len());
    for u in urls {
        if !unique.contains(&u) {
            unique.push(u);
        }
    }
    unique.join(", ").chars().take(MAX_IMAGE_LIST).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_list_dedups_in_order_and_bounds_length() {
        let got = image_list(vec!["b".into(), "a".into(), "b".into(), "c".into()]);
        assert_eq!(got, "b, a, c");

        let long: Vec<String> = (0..500).map(|i| format!("https://n1.sdlcdn.com/imgs/{i:04}.jpg")).collect();
        let got = image_list(long);
        assert_eq!(got.chars().count(), MAX_IMAGE_LIST);
        assert!(got.starts_with("https://n1.sdlcdn.com/imgs/0000.jpg, "));
    }

    #[test]
    fn image_list_cuts_on_char_boundaries() {
        let got = image_list(vec!["é".repeat(2500)]);
        assert_eq!(got.chars().count(), MAX_IMAGE_LIST);
    }
}
