use tracing::debug;

use crate::browser::{Locator, Node};
use crate::error::ReadError;

#[derive(Debug)]
pub enum Lookup<T> {
    Found(T),
    Absent,
    Failed(ReadError),
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: Default> Lookup<T> {
    pub fn or_default(self) -> T {
        match self {
            Lookup::Found(v) => v,
            Lookup::Absent => T::default(),
            Lookup::Failed(e) => {
                debug!("lookup failed, using default: {e}");
                T::default()
            }
        }
    }
}

impl Lookup<String> {
    pub fn non_empty(self) -> Self {
        match self {
            Lookup::Found(v) if v.is_empty() => Lookup::Absent,
            other => other,
        }
    }
}

/// Trimmed text of the first candidate that matches. Missing markup is
/// `Absent`, a failed read `Failed`.
pub async fn first_text<N: Node>(scope: &N, candidates: &[Locator]) -> Lookup<String> {
    let mut last_err = None;
    for locator in candidates {
        let read = match scope.find(locator).await {
            Ok(Some(el)) => el.text().await,
            Ok(None) => continue,
            Err(e) => Err(e),
        };
        match read {
            Ok(text) => return Lookup::Found(text.trim().to_string()),
            Err(e) => last_err = Some(e),
        }
    }
    last_err.map_or(Lookup::Absent, Lookup::Failed)
}

// blank values fall through to the next candidate
pub async fn first_attr<N: Node>(scope: &N, candidates: &[Locator], attr: &str) -> Lookup<String> {
    first_attr_of(scope, candidates, &[attr]).await
}

pub async fn first_attr_of<N: Node>(
    scope: &N,
    candidates: &[Locator],
    attrs: &[&str],
) -> Lookup<String> {
    let mut last_err = None;
    for locator in candidates {
        let el = match scope.find(locator).await {
            Ok(Some(el)) => el,
            Ok(None) => continue,
            Err(e) => {
                last_err = Some(e);
                continue;
            }
        };
        for attr in attrs {
            match el.attr(attr).await {
                Ok(Some(v)) if !v.trim().is_empty() => return Lookup::Found(v.trim().to_string()),
                Ok(_) => {}
                Err(e) => last_err = Some(e),
            }
        }
    }
    last_err.map_or(Lookup::Absent, Lookup::Failed)
}

pub async fn find_all<N: Node>(scope: &N, locator: &Locator) -> Vec<N> {
    match scope.find_all(locator).await {
        Ok(found) => found,
        Err(e) => {
            debug!(?locator, "find_all failed: {e}");
            Vec::new()
        }
    }
}

pub async fn text_of<N: Node>(node: &N) -> String {
    match node.text().await {
        Ok(t) => t.trim().to_string(),
        Err(e) => {
            debug!("text read failed: {e}");
            String::new()
        }
    }
}
