use crate::browser::Locator::{self, Css, Tag, TextContains};

pub struct Selectors {
    // newer layout first
    pub cards: &'static [Locator],

    pub title: &'static [Locator],
    pub price: &'static [Locator],
    pub original_price: &'static [Locator],
    pub discount: &'static [Locator],
    pub listing_rating: &'static [Locator],
    pub filled_stars: &'static [Locator],
    pub rating_count: &'static [Locator],
    pub image: &'static [Locator],
    pub product_link: &'static [Locator],
    pub short_description: &'static [Locator],

    pub next_page: &'static [Locator],

    pub brand: &'static [Locator],
    pub rating_value: &'static [Locator],
    pub review_count: &'static [Locator],
    pub availability: &'static [Locator],
    pub seller: &'static [Locator],
    pub description: &'static [Locator],
    pub breadcrumb: Locator,
    pub zoom_images: Locator,

    // sidebar filter labels, not categories
    pub filter_words: &'static [&'static str],
}

pub const IMAGE_ATTRS: &[&str] = &["src", "data-src"];

impl Selectors {
    pub fn snapdeal() -> &'static Selectors {
        &SNAPDEAL
    }
}

static SNAPDEAL: Selectors = Selectors {
    cards: &[Css("div.product-tuple-listing"), Css("div.product-tuple")],

    title: &[Css("p.product-title")],
    price: &[Css("span.product-price")],
    original_price: &[
        Css("span.product-desc-price.strike"),
        Css("span.lfloat.product-desc-price.strike"),
    ],
    discount: &[Css("div.product-discount"), Css("span.product-discount")],
    listing_rating: &[Css("p.prod-rating"), Css(".rating")],
    filled_stars: &[Css(".filled-stars")],
    rating_count: &[Css("p.product-rating-count"), Css(".rating-count")],
    image: &[Css("img.product-image"), Tag("img")],
    product_link: &[Css("a.dp-widget-link"), Tag("a")],
    short_description: &[Css("p.product-desc-rating")],

    next_page: &[
        Css("a[rel='next']"),
        Css("a.pagination-number.next"),
        Css("a.next"),
        TextContains { tag: "a", needle: "next" },
    ],

    brand: &[
        Css("span[itemprop='brand']"),
        Css("a#brand"),
        Css(".pdp-e-i-brand a"),
        Css(".pdp-e-i-brand"),
    ],
    rating_value: &[Css("span[itemprop='ratingValue']"), Css(".pdp-e-i-rating")],
    review_count: &[
        Css("span[itemprop='reviewCount']"),
        Css(".pdp-review-count"),
        Css(".product-review-count"),
        Css(".rating-count"),
    ],
    availability: &[Css(".sold-out-err"), Css("#isCODMsg"), Css(".availability-msg")],
    seller: &[Css("#sellerName"), Css(".pdp-seller-info a"), Css(".pdp-seller-info")],
    description: &[
        Css("#description"),
        Css("#productDesc"),
        Css(".product-desc"),
        Css(".tab-content .spec-body"),
        Css(".spec-body"),
        Css(".details-info"),
    ],
    breadcrumb: Css("ul.breadcrumb li"),
    zoom_images: Css(".cloudzoom"),

    filter_words: &[
        "price", "brand", "rating", "size", "color", "discount", "customer", "ship", "cod",
        "delivery", "availability", "seller", "apply", "clear", "sort", "view", "more", "less",
        "newest", "4★", "3★", "2★", "1★",
    ],
};
