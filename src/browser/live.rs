use std::rc::Rc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use thirtyfour::prelude::*;
use tokio::time::sleep;
use tracing::{debug, info};
use url::Url;

use super::{Locator, Node, Page, resolve_attr};
use crate::config::ScrapeConfig;
use crate::error::{ReadError, ScrapeError};

const POLL: Duration = Duration::from_millis(500);

/// Chrome over WebDriver. Owned by `main`; `quit` runs on every exit path.
pub struct BrowserSession {
    driver: WebDriver,
}

impl BrowserSession {
    pub async fn start(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        let session_err = |source| ScrapeError::Session {
            url: config.webdriver_url.clone(),
            source,
        };

        let mut caps = DesiredCapabilities::chrome();
        for arg in chrome_args(config.headless) {
            caps.add_arg(arg).map_err(session_err)?;
        }

        let driver = WebDriver::new(&config.webdriver_url, caps)
            .await
            .map_err(session_err)?;
        info!(webdriver = %config.webdriver_url, headless = config.headless, "browser session started");
        Ok(Self { driver })
    }

    async fn scroll_height(&self) -> Result<Option<i64>, ReadError> {
        let ret = self
            .driver
            .execute("return document.body.scrollHeight", Vec::new())
            .await?;
        Ok(ret.json().as_i64())
    }

    pub async fn quit(self) {
        if let Err(e) = self.driver.quit().await {
            debug!("quit failed: {e}");
        }
    }
}

pub fn chrome_args(headless: bool) -> Vec<&'static str> {
    let mut args = Vec::new();
    if headless {
        args.push("--headless=new");
    }
    args.extend([
        "--disable-gpu",
        "--window-size=1920,1080",
        "--no-sandbox",
        "--disable-dev-shm-usage",
        "--disable-blink-features=AutomationControlled",
    ]);
    args
}

#[derive(Clone)]
enum Scope {
    Document(WebDriver),
    Element(WebElement),
}

// `base` is the page URL at the time the document was taken; WebDriver
// reports attributes as written in the markup.
#[derive(Clone)]
pub struct LiveNode {
    scope: Scope,
    base: Option<Rc<Url>>,
}

fn by(locator: &Locator) -> By {
    match locator {
        Locator::Css(css) => By::Css(*css),
        Locator::Tag(tag) => By::Tag(*tag),
        Locator::TextContains { tag, needle } => By::XPath(Locator::text_xpath(tag, needle)),
    }
}

#[async_trait(?Send)]
impl Node for LiveNode {
    async fn find(&self, locator: &Locator) -> Result<Option<Self>, ReadError> {
        Ok(self.find_all(locator).await?.into_iter().next())
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self>, ReadError> {
        let found = match &self.scope {
            Scope::Document(driver) => driver.find_all(by(locator)).await?,
            Scope::Element(el) => el.find_all(by(locator)).await?,
        };
        Ok(found
            .into_iter()
            .map(|el| LiveNode {
                scope: Scope::Element(el),
                base: self.base.clone(),
            })
            .collect())
    }

    async fn text(&self) -> Result<String, ReadError> {
        match &self.scope {
            Scope::Document(driver) => Ok(driver.find(By::Tag("body")).await?.text().await?),
            Scope::Element(el) => Ok(el.text().await?),
        }
    }

    async fn attr(&self, name: &str) -> Result<Option<String>, ReadError> {
        match &self.scope {
            Scope::Document(_) => Ok(None),
            Scope::Element(el) => Ok(el
                .attr(name)
                .await?
                .map(|v| resolve_attr(self.base.as_deref(), name, v))),
        }
    }

    async fn left(&self) -> Result<Option<f64>, ReadError> {
        match &self.scope {
            Scope::Document(_) => Ok(Some(0.0)),
            Scope::Element(el) => Ok(Some(el.rect().await?.x)),
        }
    }
}

#[async_trait(?Send)]
impl Page for BrowserSession {
    type Node = LiveNode;
    type Tab = WindowHandle;

    async fn goto(&self, url: &str) -> Result<(), ReadError> {
        Ok(self.driver.goto(url).await?)
    }

    async fn document(&self) -> Result<LiveNode, ReadError> {
        let base = Url::parse(&self.current_url().await?).ok().map(Rc::new);
        Ok(LiveNode {
            scope: Scope::Document(self.driver.clone()),
            base,
        })
    }

    async fn current_url(&self) -> Result<String, ReadError> {
        Ok(self.driver.current_url().await?.to_string())
    }

    async fn click(&self, node: &LiveNode) -> Result<(), ReadError> {
        let Scope::Element(el) = &node.scope else {
            return Ok(());
        };
        self.driver
            .execute("arguments[0].click();", vec![el.to_json()?])
            .await?;
        Ok(())
    }

    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> bool {
        let start = Instant::now();
        while start.elapsed() < timeout {
            match self.driver.find_all(by(locator)).await {
                Ok(found) if !found.is_empty() => return true,
                _ => sleep(POLL).await,
            }
        }
        false
    }

    async fn wait_for_url_change(&self, from: &str, timeout: Duration) -> bool {
        let start = Instant::now();
        loop {
            if let Ok(url) = self.current_url().await {
                if url != from {
                    return true;
                }
            }
            if start.elapsed() >= timeout {
                return false;
            }
            sleep(POLL).await;
        }
    }

    async fn scroll_to_bottom(&self, pause: Duration) -> Result<(), ReadError> {
        let mut last = self.scroll_height().await?;
        loop {
            self.driver
                .execute("window.scrollTo(0, document.body.scrollHeight);", Vec::new())
                .await?;
            sleep(pause).await;
            let new = self.scroll_height().await?;
            if new == last {
                return Ok(());
            }
            last = new;
        }
    }

    async fn current_tab(&self) -> Result<WindowHandle, ReadError> {
        Ok(self.driver.window().await?)
    }

    async fn tabs(&self) -> Result<Vec<WindowHandle>, ReadError> {
        Ok(self.driver.windows().await?)
    }

    async fn open_tab(&self, url: &str, timeout: Duration) -> Result<WindowHandle, ReadError> {
        let before = self.driver.windows().await?;
        self.driver
            .execute(
                "window.open(arguments[0], '_blank');",
                vec![Value::String(url.to_string())],
            )
            .await?;

        let start = Instant::now();
        let handles = loop {
            let handles = self.driver.windows().await?;
            if handles.len() > before.len() {
                break handles;
            }
            if start.elapsed() >= timeout {
                return Err(ReadError::Timeout(timeout.as_secs()));
            }
            sleep(POLL).await;
        };

        let Some(tab) = handles.into_iter().find(|h| !before.contains(h)) else {
            return Err(ReadError::Timeout(timeout.as_secs()));
        };
        self.driver.switch_to_window(tab.clone()).await?;

        while start.elapsed() < timeout {
            let ready = self
                .driver
                .execute("return document.readyState", Vec::new())
                .await?;
            if ready.json().as_str() == Some("complete") {
                break;
            }
            sleep(POLL).await;
        }
        Ok(tab)
    }

    async fn close_tabs(&self, parent: &WindowHandle, keep: &[WindowHandle]) -> Result<(), ReadError> {
        let mut failed = None;
        for handle in self.driver.windows().await? {
            if keep.contains(&handle) {
                continue;
            }
            let closed = match self.driver.switch_to_window(handle).await {
                Ok(()) => self.driver.close_window().await,
                Err(e) => Err(e),
            };
            if let Err(e) = closed {
                debug!("could not close auxiliary tab: {e}");
                failed.get_or_insert(e);
            }
        }
        self.driver.switch_to_window(parent.clone()).await?;
        match failed {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}
