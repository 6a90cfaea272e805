use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;
use url::Url;

use crate::browser::{Locator, Node, Page};
use crate::lookup;
use crate::selectors::Selectors;

lazy_static! {
    static ref COUNT_BADGE: Regex = Regex::new(r"^\d[\d,\. ]*$").expect("static regex");
}

pub const ALL_LABEL: &str = "(All)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subcategory {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Anchor {
    pub text: String,
    pub href: String,
    pub left: Option<f64>,
}

pub struct Rules<'a> {
    pub site_domain: &'a str,
    pub left_x_threshold: f64,
    pub filter_words: &'a [&'a str],
}

impl<'a> Rules<'a> {
    pub fn new(site_domain: &'a str, left_x_threshold: f64, selectors: &'a Selectors) -> Self {
        Self {
            site_domain,
            left_x_threshold,
            filter_words: selectors.filter_words,
        }
    }

    pub fn accepts(&self, anchor: &Anchor) -> bool {
        let len = anchor.text.chars().count();
        if !(3..=60).contains(&len) {
            return false;
        }

        let host = Url::parse(&anchor.href)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();
        if !host.contains(self.site_domain) {
            return false;
        }
        if !anchor.href.contains("/products/") && !anchor.href.contains("/search") {
            return false;
        }

        match anchor.left {
            Some(x) if x < self.left_x_threshold => {}
            _ => return false,
        }

        let lower = anchor.text.to_lowercase();
        if self.filter_words.iter().any(|w| lower.contains(*w)) {
            return false;
        }
        !COUNT_BADGE.is_match(&anchor.text)
    }
}

// dedup on (label, url), first-seen order
pub fn classify(anchors: impl IntoIterator<Item = Anchor>, rules: &Rules<'_>) -> Vec<Subcategory> {
    let mut seen = HashSet::new();
    anchors
        .into_iter()
        .filter(|a| rules.accepts(a))
        .filter(|a| seen.insert((a.text.clone(), a.href.clone())))
        .map(|a| Subcategory {
            label: a.text,
            url: a.href,
        })
        .collect()
}

pub fn or_all(found: Vec<Subcategory>, base_url: &str) -> Vec<Subcategory> {
    if found.is_empty() {
        vec![Subcategory {
            label: ALL_LABEL.to_string(),
            url: base_url.to_string(),
        }]
    } else {
        found
    }
}

pub async fn discover<P: Page>(page: &P, rules: &Rules<'_>) -> Vec<Subcategory> {
    let doc = match page.document().await {
        Ok(doc) => doc,
        Err(e) => {
            debug!("no document for subcategory scan: {e}");
            return Vec::new();
        }
    };

    let mut anchors = Vec::new();
    for a in lookup::find_all(&doc, &Locator::Css("a[href]")).await {
        let href = match a.attr("href").await {
            Ok(Some(h)) => h,
            _ => continue,
        };
        let left = a.left().await.unwrap_or(None);
        anchors.push(Anchor {
            text: lookup::text_of(&a).await,
            href,
            left,
        });
    }
    classify(anchors, rules)
}
