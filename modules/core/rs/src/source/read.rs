use derive_getters::{Dissolve, Getters};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

use crate::loc::Interval;

/// Opaque continuation token handed out by a paginated source.
#[derive(
    Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
)]
#[display("{_0}")]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Cursor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Cursor {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

/// Aligned read reduced to what coverage needs: it covers positions [position, position + length).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Dissolve, Serialize, Deserialize)]
pub struct ReadAlignment {
    pub position: u64,
    pub length: u64,
}

impl ReadAlignment {
    pub fn new(position: u64, length: u64) -> Self {
        Self { position, length }
    }

    /// Closed interval of covered positions, None for reads without aligned bases.
    pub fn covered(&self) -> Option<Interval<u64>> {
        Interval::spanning(self.position, self.length)
    }
}

/// A single response of a read source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Dissolve, Getters)]
pub struct Page {
    reads: Vec<ReadAlignment>,
    next_cursor: Option<Cursor>,
}

impl Page {
    /// Empty cursors are treated as "no more pages".
    pub fn new(reads: Vec<ReadAlignment>, next_cursor: Option<Cursor>) -> Self {
        let next_cursor = next_cursor.filter(|cursor| !cursor.as_str().is_empty());
        Self { reads, next_cursor }
    }

    /// Last page of a stream.
    pub fn last(reads: Vec<ReadAlignment>) -> Self {
        Self::new(reads, None)
    }

    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_covered() {
        assert_eq!(ReadAlignment::new(10, 3).covered(), Some(Interval::new(10, 12).unwrap()));
        assert_eq!(ReadAlignment::new(10, 0).covered(), None);
    }

    #[test]
    fn test_page_cursor() {
        let page = Page::new(vec![ReadAlignment::new(1, 1)], Some(Cursor::from("")));
        assert!(page.is_last());

        let page = Page::new(vec![], Some(Cursor::from("200:300")));
        assert!(!page.is_last());
        assert_eq!(page.next_cursor().as_ref().map(|x| x.as_str()), Some("200:300"));
        assert_eq!(page.next_cursor().as_ref().unwrap().to_string(), "200:300");
    }
}
