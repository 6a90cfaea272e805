use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{Locator, Node, Page, resolve_attr};
use crate::error::ReadError;

const BLANK: &str = "<html><head></head><body></body></html>";

#[derive(Clone, Debug)]
pub struct FixtureNode {
    html: Rc<str>,
    document: bool,
    base: Option<Rc<Url>>,
}

impl FixtureNode {
    pub fn document(html: &str, url: &str) -> Self {
        Self {
            html: Rc::from(html),
            document: true,
            base: Url::parse(url).ok().map(Rc::new),
        }
    }

    fn parse(&self) -> Html {
        if self.document {
            Html::parse_document(&self.html)
        } else {
            Html::parse_fragment(&self.html)
        }
    }

    fn child(&self, el: ElementRef<'_>) -> Self {
        Self {
            html: Rc::from(el.html()),
            document: false,
            base: self.base.clone(),
        }
    }

    fn matches(&self, doc: &Html, locator: &Locator) -> Result<Vec<Self>, ReadError> {
        let me = own_element(doc, self.document).map(|el| el.id());
        let not_me = |el: &ElementRef<'_>| Some(el.id()) != me;

        let found = match locator {
            Locator::Css(css) | Locator::Tag(css) => {
                let sel = Selector::parse(css).map_err(|_| ReadError::Selector(css.to_string()))?;
                doc.select(&sel).filter(not_me).map(|el| self.child(el)).collect()
            }
            Locator::TextContains { tag, needle } => {
                let sel = Selector::parse(tag).map_err(|_| ReadError::Selector(tag.to_string()))?;
                let needle = needle.to_ascii_lowercase();
                doc.select(&sel)
                    .filter(not_me)
                    .filter(|el| collapse(el).to_ascii_lowercase().contains(&needle))
                    .map(|el| self.child(el))
                    .collect()
            }
        };
        Ok(found)
    }
}

// `<html>` for a document, the first element of a fragment
fn own_element(doc: &Html, document: bool) -> Option<ElementRef<'_>> {
    let root = doc.root_element();
    if document {
        Some(root)
    } else {
        root.children().find_map(ElementRef::wrap)
    }
}

fn collapse(el: &ElementRef<'_>) -> String {
    let text: String = el.text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait(?Send)]
impl Node for FixtureNode {
    async fn find(&self, locator: &Locator) -> Result<Option<Self>, ReadError> {
        Ok(self.matches(&self.parse(), locator)?.into_iter().next())
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self>, ReadError> {
        self.matches(&self.parse(), locator)
    }

    async fn text(&self) -> Result<String, ReadError> {
        let doc = self.parse();
        Ok(own_element(&doc, self.document).map(|el| collapse(&el)).unwrap_or_default())
    }

    async fn attr(&self, name: &str) -> Result<Option<String>, ReadError> {
        let doc = self.parse();
        let value = own_element(&doc, self.document).and_then(|el| el.value().attr(name));
        Ok(value.map(|v| resolve_attr(self.base.as_deref(), name, v.to_string())))
    }

    // no layout engine: x offset comes from `data-left`
    async fn left(&self) -> Result<Option<f64>, ReadError> {
        Ok(self
            .attr("data-left")
            .await?
            .and_then(|v| v.trim().parse::<f64>().ok()))
    }
}

#[derive(Debug, Clone)]
struct Tab {
    handle: String,
    url: String,
}

// Unknown URLs render blank.
pub struct FixtureBrowser {
    pages: HashMap<String, String>,
    broken: HashSet<String>,
    detached: HashSet<String>,
    tabs: RefCell<Vec<Tab>>,
    active: Cell<usize>,
    opened: Cell<usize>,
}

impl FixtureBrowser {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            broken: HashSet::new(),
            detached: HashSet::new(),
            tabs: RefCell::new(vec![Tab {
                handle: "tab-0".into(),
                url: "about:blank".into(),
            }]),
            active: Cell::new(0),
            opened: Cell::new(0),
        }
    }

    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    // opening `url` switches to the new tab, then times out
    pub fn with_broken_tab(mut self, url: &str) -> Self {
        self.broken.insert(url.to_string());
        self
    }

    // opening `url` leaves the tab in the background and times out unswitched
    pub fn with_detached_tab(mut self, url: &str) -> Self {
        self.detached.insert(url.to_string());
        self
    }

    pub fn tabs_opened(&self) -> usize {
        self.opened.get()
    }

    // main tab included
    pub fn tabs_open(&self) -> usize {
        self.tabs.borrow().len()
    }

    fn active_url(&self) -> String {
        self.tabs.borrow()[self.active.get()].url.clone()
    }

    fn navigate(&self, url: &str) {
        self.tabs.borrow_mut()[self.active.get()].url = url.to_string();
    }
}

impl Default for FixtureBrowser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl Page for FixtureBrowser {
    type Node = FixtureNode;
    type Tab = String;

    async fn goto(&self, url: &str) -> Result<(), ReadError> {
        self.navigate(url);
        Ok(())
    }

    async fn document(&self) -> Result<FixtureNode, ReadError> {
        let url = self.active_url();
        let html = self.pages.get(&url).map(String::as_str).unwrap_or(BLANK);
        Ok(FixtureNode::document(html, &url))
    }

    async fn current_url(&self) -> Result<String, ReadError> {
        Ok(self.active_url())
    }

    async fn click(&self, node: &FixtureNode) -> Result<(), ReadError> {
        if let Some(href) = node.attr("href").await? {
            self.navigate(&href);
        }
        Ok(())
    }

    async fn wait_for(&self, locator: &Locator, _timeout: Duration) -> bool {
        match self.document().await {
            Ok(doc) => matches!(doc.find(locator).await, Ok(Some(_))),
            Err(_) => false,
        }
    }

    async fn wait_for_url_change(&self, from: &str, _timeout: Duration) -> bool {
        self.active_url() != from
    }

    async fn scroll_to_bottom(&self, _pause: Duration) -> Result<(), ReadError> {
        Ok(())
    }

    async fn current_tab(&self) -> Result<String, ReadError> {
        Ok(self.tabs.borrow()[self.active.get()].handle.clone())
    }

    async fn tabs(&self) -> Result<Vec<String>, ReadError> {
        Ok(self.tabs.borrow().iter().map(|t| t.handle.clone()).collect())
    }

    async fn open_tab(&self, url: &str, timeout: Duration) -> Result<String, ReadError> {
        self.opened.set(self.opened.get() + 1);
        let handle = format!("tab-{}", self.opened.get());
        {
            let mut tabs = self.tabs.borrow_mut();
            tabs.push(Tab {
                handle: handle.clone(),
                url: url.to_string(),
            });
            if self.detached.contains(url) {
                return Err(ReadError::Timeout(timeout.as_secs()));
            }
            self.active.set(tabs.len() - 1);
        }
        if self.broken.contains(url) {
            return Err(ReadError::Timeout(timeout.as_secs()));
        }
        Ok(handle)
    }

    async fn close_tabs(&self, parent: &String, keep: &[String]) -> Result<(), ReadError> {
        let mut tabs = self.tabs.borrow_mut();
        tabs.retain(|t| keep.contains(&t.handle));
        match tabs.iter().position(|t| t.handle == *parent) {
            Some(idx) => {
                self.active.set(idx);
                Ok(())
            }
            None => {
                self.active.set(0);
                Err(ReadError::MissingTab(parent.clone()))
            }
        }
    }
}
