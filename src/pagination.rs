use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::browser::{Node, Page};
use crate::selectors::Selectors;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTurn {
    Advanced,
    LastPage,
}

/// Click the first next-page link that actually changes the URL.
pub async fn next_page<P: Page>(
    page: &P,
    selectors: &Selectors,
    settle: Duration,
    wait: Duration,
) -> PageTurn {
    let Ok(before) = page.current_url().await else {
        return PageTurn::LastPage;
    };
    let Ok(doc) = page.document().await else {
        return PageTurn::LastPage;
    };

    for locator in selectors.next_page {
        let link = match doc.find(locator).await {
            Ok(Some(link)) => link,
            Ok(None) => continue,
            Err(e) => {
                debug!(?locator, "next-page lookup failed: {e}");
                continue;
            }
        };
        if let Err(e) = page.click(&link).await {
            debug!(?locator, "next-page click failed: {e}");
            continue;
        }
        sleep(settle).await;
        if page.wait_for_url_change(&before, wait).await {
            return PageTurn::Advanced;
        }
    }
    PageTurn::LastPage
}
