use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::browser::{Node, Page};
use crate::lookup::{self, first_attr, first_attr_of, first_text};
use crate::normalize::{Audience, first_int, rating_cell, rating_from_style};
use crate::selectors::{IMAGE_ATTRS, Selectors};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingCard {
    pub name: String,
    pub price: String,
    pub original_price: String,
    pub discount: String,
    pub rating: String,
    pub reviews: u64,
    pub image_url: String,
    pub product_url: String,
    pub short_description: String,
    pub audience: Audience,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingSource {
    // star-bar width only
    Stars,
    // rating text on the card, else the star bar
    TextOrStars,
}

#[derive(Debug)]
pub enum ListingScan<N> {
    // no card container matched: block page, captcha or new markup
    Blocked,
    Cards(Vec<N>),
}

pub async fn locate_cards<P: Page>(page: &P, selectors: &Selectors) -> ListingScan<P::Node> {
    let doc = match page.document().await {
        Ok(doc) => doc,
        Err(e) => {
            debug!("no document to scan: {e}");
            return ListingScan::Blocked;
        }
    };
    for locator in selectors.cards {
        let cards = lookup::find_all(&doc, locator).await;
        if !cards.is_empty() {
            return ListingScan::Cards(cards);
        }
    }
    ListingScan::Blocked
}

// a missing field keeps its default
pub async fn read_card<N: Node>(card: &N, selectors: &Selectors, rating_source: RatingSource) -> ListingCard {
    let name = first_text(card, selectors.title).await.or_default();
    let price = first_text(card, selectors.price).await.or_default();
    let original_price = first_text(card, selectors.original_price).await.or_default();
    let discount = first_text(card, selectors.discount).await.or_default();

    let mut rating = match rating_source {
        RatingSource::TextOrStars => first_text(card, selectors.listing_rating).await.or_default(),
        RatingSource::Stars => String::new(),
    };
    if rating.is_empty() {
        let style = first_attr(card, selectors.filled_stars, "style").await.or_default();
        rating = rating_cell(rating_from_style(&style));
    }

    let reviews = first_int(&first_text(card, selectors.rating_count).await.or_default());
    let image_url = first_attr_of(card, selectors.image, IMAGE_ATTRS).await.or_default();
    let product_url = first_attr(card, selectors.product_link, "href").await.or_default();
    let short_description = first_text(card, selectors.short_description).await.or_default();
    let audience = Audience::classify(&name, &short_description);

    ListingCard {
        name,
        price,
        original_price,
        discount,
        rating,
        reviews,
        image_url,
        product_url,
        short_description,
        audience,
    }
}

/// `None` when no card container was found at all.
pub async fn scan_page<P: Page>(
    page: &P,
    selectors: &Selectors,
    max_cards: Option<usize>,
    rating_source: RatingSource,
) -> Option<Vec<ListingCard>> {
    let cards = match locate_cards(page, selectors).await {
        ListingScan::Cards(cards) => cards,
        ListingScan::Blocked => {
            warn!("no product cards located; page blocked or markup changed");
            return None;
        }
    };
    let take = max_cards.unwrap_or(cards.len());
    let mut out = Vec::with_capacity(take.min(cards.len()));
    for card in cards.iter().take(take) {
        out.push(read_card(card, selectors, rating_source).await);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fixture::FixtureBrowser;

    const URL: &str = "https://www.snapdeal.com/search?keyword=footwear";

    fn page(body: &str) -> FixtureBrowser {
        FixtureBrowser::new().with_page(URL, format!("<html><body>{body}</body></html>"))
    }

    async fn loaded(body: &str) -> FixtureBrowser {
        let p = page(body);
        p.goto(URL).await.unwrap();
        p
    }

    const FULL_CARD: &str = r#"
        <div class="product-tuple-listing">
          <a class="dp-widget-link" href="/product/sparx-men-sneakers/6611">
            <img class="product-image" src="https://n1.sdlcdn.com/imgs/a.jpg">
          </a>
          <p class="product-title">Sparx Men Sneakers</p>
          <span class="lfloat product-desc-price strike">Rs. 1,499</span>
          <span class="product-price">Rs. 899</span>
          <div class="product-discount">40% Off</div>
          <div class="filled-stars" style="width: 86%"></div>
          <p class="product-rating-count">(128)</p>
          <p class="product-desc-rating">Lightweight running shoe</p>
        </div>"#;

    #[tokio::test]
    async fn reads_every_listing_field() {
        let p = loaded(FULL_CARD).await;
        let cards = scan_page(&p, Selectors::snapdeal(), None, RatingSource::TextOrStars).await.unwrap();
        assert_eq!(cards.len(), 1);
        let c = &cards[0];
        assert_eq!(c.name, "Sparx Men Sneakers");
        assert_eq!(c.price, "Rs. 899");
        assert_eq!(c.original_price, "Rs. 1,499");
        assert_eq!(c.discount, "40% Off");
        assert_eq!(c.rating, "4.3");
        assert_eq!(c.reviews, 128);
        assert_eq!(c.image_url, "https://n1.sdlcdn.com/imgs/a.jpg");
        assert_eq!(c.product_url, "https://www.snapdeal.com/product/sparx-men-sneakers/6611");
        assert_eq!(c.short_description, "Lightweight running shoe");
        assert_eq!(c.audience, Audience::Male);
    }

    #[tokio::test]
    async fn legacy_cards_and_lazy_images() {
        let p = loaded(
            r#"<div class="product-tuple">
                 <a href="/product/x/1"><img data-src="/imgs/lazy.jpg"></a>
                 <p class="product-title">Ladies Handbag</p>
               </div>"#,
        )
        .await;
        let cards = scan_page(&p, Selectors::snapdeal(), None, RatingSource::TextOrStars).await.unwrap();
        assert_eq!(cards[0].image_url, "https://www.snapdeal.com/imgs/lazy.jpg");
        assert_eq!(cards[0].product_url, "https://www.snapdeal.com/product/x/1");
        assert_eq!(cards[0].rating, "");
        assert_eq!(cards[0].reviews, 0);
        assert_eq!(cards[0].audience, Audience::Female);
    }

    #[tokio::test]
    async fn stars_only_ignores_rating_text() {
        let p = loaded(
            r#"<div class="product-tuple-listing">
                 <p class="product-title">Puma Cap</p>
                 <div class="rating">Rated by 40 buyers</div>
                 <div class="filled-stars" style="width: 70%"></div>
               </div>"#,
        )
        .await;
        let stars = scan_page(&p, Selectors::snapdeal(), None, RatingSource::Stars).await.unwrap();
        assert_eq!(stars[0].rating, "3.5");
        let text = scan_page(&p, Selectors::snapdeal(), None, RatingSource::TextOrStars).await.unwrap();
        assert_eq!(text[0].rating, "Rated by 40 buyers");
    }

    #[tokio::test]
    async fn no_cards_is_blocked_not_empty() {
        let p = loaded("<p>Please verify you are human</p>").await;
        assert!(scan_page(&p, Selectors::snapdeal(), None, RatingSource::TextOrStars).await.is_none());
    }

    #[tokio::test]
    async fn cap_limits_cards_read() {
        let body = FULL_CARD.repeat(4);
        let p = loaded(&body).await;
        assert_eq!(scan_page(&p, Selectors::snapdeal(), Some(2), RatingSource::TextOrStars).await.unwrap().len(), 2);
        assert_eq!(scan_page(&p, Selectors::snapdeal(), Some(0), RatingSource::TextOrStars).await.unwrap().len(), 0);
    }
}
