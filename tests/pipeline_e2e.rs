use snapdeal_scrape::browser::Page;
use snapdeal_scrape::browser::fixture::FixtureBrowser;
use snapdeal_scrape::export::write_records;
use snapdeal_scrape::{ColumnSet, ScrapeConfig, Scraper, Section};

const FOOTWEAR: &str = "https://www.snapdeal.com/search?keyword=footwear";

fn config(base: ScrapeConfig, url: &str) -> ScrapeConfig {
    ScrapeConfig {
        sections: vec![Section {
            label: "Footwear".into(),
            url: url.into(),
        }],
        listing_wait_secs: 0,
        product_wait_secs: 0,
        next_page_wait_secs: 0,
        settle_ms: 0,
        scroll_pause_ms: 0,
        ..base
    }
}

fn card(name: &str, price: Option<&str>, href: &str) -> String {
    let price = price
        .map(|p| format!(r#"<span class="product-price">{p}</span>"#))
        .unwrap_or_default();
    format!(
        r#"<div class="product-tuple-listing">
             <a class="dp-widget-link" href="{href}"><img class="product-image" src="/imgs/{href}.jpg"></a>
             <p class="product-title">{name}</p>
             {price}
             <div class="filled-stars" style="width: 90%"></div>
           </div>"#
    )
}

fn html(body: &str) -> String {
    format!("<html><body>{body}</body></html>")
}

#[tokio::test]
async fn missing_price_on_one_card_does_not_stop_the_page() {
    let body = [
        card("Sparx Men Sneakers", Some("Rs. 899"), "/product/a/1"),
        card("Bata Women Sandals", None, "/product/b/2"),
        card("Kids School Shoes", Some("Rs. 499"), "/product/c/3"),
    ]
    .concat();
    let browser = FixtureBrowser::new().with_page(FOOTWEAR, html(&body));
    let cfg = config(ScrapeConfig::basic(), FOOTWEAR);

    let (records, summary) = Scraper::new(&browser, &cfg).run().await;

    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| !r.name.is_empty()));
    assert_eq!(records[0].price, "Rs. 899");
    assert_eq!(records[1].price, "");
    assert_eq!(records[2].price, "Rs. 499");
    assert!(records.iter().all(|r| r.rating_listing == "4.5"));
    assert_eq!(summary.records, 3);
    assert_eq!(summary.blocked_pages, 0);
}

#[tokio::test]
async fn relative_links_and_lazy_images_are_written_absolute() {
    let body = r#"<div class="product-tuple-listing">
           <a class="dp-widget-link" href="/product/a/1"><img class="product-image" data-src="/imgs/lazy.jpg"></a>
           <p class="product-title">Sparx Men Sneakers</p>
         </div>"#;
    let browser = FixtureBrowser::new().with_page(FOOTWEAR, html(body));
    let cfg = config(ScrapeConfig::basic(), FOOTWEAR);

    let (records, _) = Scraper::new(&browser, &cfg).run().await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].image_url, "https://www.snapdeal.com/imgs/lazy.jpg");
    assert_eq!(records[0].product_url, "https://www.snapdeal.com/product/a/1");
}

#[tokio::test]
async fn page_without_cards_yields_no_records() {
    let browser = FixtureBrowser::new().with_page(FOOTWEAR, html("<h1>Access denied</h1>"));
    let cfg = config(ScrapeConfig::rich(), FOOTWEAR);

    let (records, summary) = Scraper::new(&browser, &cfg).run().await;

    assert!(records.is_empty());
    assert_eq!(summary.sections, 1);
    assert_eq!(summary.subcategories, 1);
    assert_eq!(summary.blocked_pages, 1);
    assert_eq!(browser.tabs_opened(), 0);

    let mut out = Vec::new();
    write_records(&mut out, &records, cfg.columns).unwrap();
    assert_eq!(String::from_utf8_lossy(&out).lines().count(), 1);
}

#[tokio::test]
async fn without_deep_scrape_detail_columns_keep_defaults() {
    let body = [
        card("Sparx Men Sneakers", Some("Rs. 899"), "/product/a/1"),
        card("Puma Running Shoes", Some("Rs. 1,999"), "/product/d/4"),
    ]
    .concat();
    let browser = FixtureBrowser::new().with_page(FOOTWEAR, html(&body));
    let cfg = ScrapeConfig {
        deep_scrape: false,
        discover_subcategories: false,
        ..config(ScrapeConfig::rich(), FOOTWEAR)
    };

    let (records, _) = Scraper::new(&browser, &cfg).run().await;

    assert_eq!(records.len(), 2);
    assert_eq!(browser.tabs_opened(), 0);
    for r in &records {
        assert_eq!(r.rating_detail, "");
        assert_eq!(r.reviews_detail, 0);
        assert_eq!(r.availability, "");
        assert_eq!(r.seller, "");
        assert_eq!(r.detail_images, "");
        assert_eq!(r.full_description, "");
        assert_eq!(r.breadcrumb, "");
        assert_eq!(r.subcategory, "(All)");
        assert_eq!(r.row(ColumnSet::Rich).len(), 22);
    }
    assert_eq!(records[0].brand, "Sparx");
    assert_eq!(records[1].brand, "Puma");
}

#[tokio::test]
async fn sidebar_subcategories_are_paged_through() {
    let sandals = "https://www.snapdeal.com/search?keyword=sandals";
    let sandals_p2 = "https://www.snapdeal.com/search?keyword=sandals&page=2";
    let slippers = "https://www.snapdeal.com/products/slippers";

    let sidebar = format!(
        r#"<div class="sidebar">
             <a data-left="20" href="{sandals}">Sandals</a>
             <a data-left="20" href="{slippers}">Slippers</a>
             <a data-left="20" href="{sandals}">Sandals</a>
             <a data-left="20" href="{FOOTWEAR}&price=0-500">Price 0 - 500</a>
             <a data-left="20" href="{FOOTWEAR}&count=1">1,204</a>
             <a data-left="900" href="{FOOTWEAR}&promo=1">Festive Deals</a>
             <a data-left="20" href="https://help.example.com/search">Help</a>
           </div>"#
    );
    let section = html(&format!("{sidebar}{}", card("Any Shoe", Some("Rs. 1"), "/product/z/0")));
    let sandals_page1 = html(&format!(
        r#"{}{}<a rel="next" href="{sandals_p2}">Next</a>"#,
        card("Bata Women Sandals", Some("Rs. 599"), "/product/s/1"),
        card("Paragon Men Sandals", Some("Rs. 399"), "/product/s/2"),
    ));
    let sandals_page2 = html(&card("Crocs Kids Clogs", Some("Rs. 1,299"), "/product/s/3"));
    let slippers_page = html(&card("Flite Slippers", Some("Rs. 199"), "/product/f/1"));

    let browser = FixtureBrowser::new()
        .with_page(FOOTWEAR, section)
        .with_page(sandals, sandals_page1)
        .with_page(sandals_p2, sandals_page2)
        .with_page(slippers, slippers_page);
    let cfg = ScrapeConfig {
        deep_scrape: false,
        ..config(ScrapeConfig::rich(), FOOTWEAR)
    };

    let (records, summary) = Scraper::new(&browser, &cfg).run().await;

    let rows: Vec<_> = records
        .iter()
        .map(|r| (r.subcategory.as_str(), r.name.as_str(), r.page))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Sandals", "Bata Women Sandals", 1),
            ("Sandals", "Paragon Men Sandals", 1),
            ("Sandals", "Crocs Kids Clogs", 2),
            ("Slippers", "Flite Slippers", 1),
        ]
    );
    assert_eq!(summary.subcategories, 2);
    assert_eq!(summary.pages, 3);
    assert!(records.iter().all(|r| r.section == "Footwear"));
}

#[tokio::test]
async fn page_cap_stops_pagination() {
    let p2 = format!("{FOOTWEAR}&page=2");
    let page1 = html(&format!(
        r#"{}<a rel="next" href="{p2}">Next</a>"#,
        card("Sparx Men Sneakers", Some("Rs. 899"), "/product/a/1")
    ));
    let page2 = html(&card("Never Reached", Some("Rs. 1"), "/product/x/9"));
    let browser = FixtureBrowser::new()
        .with_page(FOOTWEAR, page1)
        .with_page(&p2, page2);
    let cfg = config(ScrapeConfig::basic(), FOOTWEAR);

    let (records, summary) = Scraper::new(&browser, &cfg).run().await;

    assert_eq!(records.len(), 1);
    assert_eq!(summary.pages, 1);
    assert_eq!(browser.current_url().await.unwrap(), FOOTWEAR);
}
