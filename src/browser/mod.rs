pub mod fixture;
pub mod live;

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::ReadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    Css(&'static str),
    Tag(&'static str),
    // `tag` elements whose text contains `needle`, ASCII case ignored
    TextContains {
        tag: &'static str,
        needle: &'static str,
    },
}

impl Locator {
    pub fn text_xpath(tag: &str, needle: &str) -> String {
        let needle = needle.to_ascii_lowercase();
        let upper = needle.to_ascii_uppercase();
        format!(".//{tag}[contains(translate(., '{upper}', '{needle}'), '{needle}')]")
    }
}

// Attributes that hold links; both backends hand them out absolute.
const URL_ATTRS: &[&str] = &["href", "src", "data-src"];

pub fn resolve_attr(base: Option<&Url>, name: &str, value: String) -> String {
    if !URL_ATTRS.contains(&name) || value.trim().is_empty() {
        return value;
    }
    let trimmed = value.trim();
    match base.and_then(|b| b.join(trimmed).ok()) {
        Some(url) => url.to_string(),
        None => trimmed.to_string(),
    }
}

/// A search scope: the whole document or one element of it.
/// "Nothing matched" is `Ok(None)` or an empty vec, never an error.
#[async_trait(?Send)]
pub trait Node: Sized {
    async fn find(&self, locator: &Locator) -> Result<Option<Self>, ReadError>;
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self>, ReadError>;
    async fn text(&self) -> Result<String, ReadError>;
    async fn attr(&self, name: &str) -> Result<Option<String>, ReadError>;
    // rendered x offset in CSS pixels
    async fn left(&self) -> Result<Option<f64>, ReadError>;
}

#[async_trait(?Send)]
pub trait Page {
    type Node: Node;
    type Tab: Clone + PartialEq + std::fmt::Debug;

    async fn goto(&self, url: &str) -> Result<(), ReadError>;
    async fn document(&self) -> Result<Self::Node, ReadError>;
    async fn current_url(&self) -> Result<String, ReadError>;
    async fn click(&self, node: &Self::Node) -> Result<(), ReadError>;

    // timing out is `false`, not an error
    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> bool;
    async fn wait_for_url_change(&self, from: &str, timeout: Duration) -> bool;
    async fn scroll_to_bottom(&self, pause: Duration) -> Result<(), ReadError>;

    async fn current_tab(&self) -> Result<Self::Tab, ReadError>;
    async fn tabs(&self) -> Result<Vec<Self::Tab>, ReadError>;
    async fn open_tab(&self, url: &str, timeout: Duration) -> Result<Self::Tab, ReadError>;
    /// Close every tab not in `keep`, active or not, then activate `parent`.
    async fn close_tabs(&self, parent: &Self::Tab, keep: &[Self::Tab]) -> Result<(), ReadError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("href", "/product/a/1", "https://www.snapdeal.com/product/a/1")]
    #[case("src", " //n1.sdlcdn.com/imgs/a.jpg ", "https://n1.sdlcdn.com/imgs/a.jpg")]
    #[case("data-src", "/imgs/lazy.jpg", "https://www.snapdeal.com/imgs/lazy.jpg")]
    #[case("href", "https://help.example.com/x", "https://help.example.com/x")]
    #[case("style", "width: 80%", "width: 80%")]
    #[case("data-src", "  ", "  ")]
    fn link_attributes_come_back_absolute(#[case] name: &str, #[case] raw: &str, #[case] want: &str) {
        let base = Url::parse("https://www.snapdeal.com/search?keyword=footwear").unwrap();
        assert_eq!(resolve_attr(Some(&base), name, raw.to_string()), want);
    }

    #[test]
    fn without_a_base_links_are_only_trimmed() {
        assert_eq!(resolve_attr(None, "href", " /p/1 ".into()), "/p/1");
    }
}
