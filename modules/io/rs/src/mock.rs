use readcov_core_rs::loc::IntervalOp;
use readcov_core_rs::source::{ApiError, Cursor, Page, ReadAlignment, ReadSource, SourceLocus};

/// Positions served by a single mock page.
pub const PAGE_SPAN: u64 = 100;

/// Deterministic read source without side effects.
///
/// Every page starts at the requested start rounded down to a multiple of [`PAGE_SPAN`] (`base`)
/// and holds 99 reads: the read at `base + k` spans `PAGE_SPAN - k` positions, so a lone page
/// covers `base + k` exactly `k` times. While `base + PAGE_SPAN` is below the requested end, the
/// page carries a `"{base + PAGE_SPAN}:{end}"` cursor that overrides the locus of the next request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MockReadSource;

impl MockReadSource {
    pub fn new() -> Self {
        Self
    }

    fn parse_cursor(cursor: &Cursor) -> Result<(u64, u64), ApiError> {
        let invalid = || ApiError::BadRequest(format!("invalid mock page token: {cursor}"));
        let (start, end) = cursor.as_str().split_once(':').ok_or_else(invalid)?;
        match (start.parse::<u64>(), end.parse::<u64>()) {
            (Ok(start), Ok(end)) => Ok((start, end)),
            _ => Err(invalid()),
        }
    }

    /// The page that starts the walk at `start` for a query ending at `end`.
    pub fn page(start: u64, end: u64) -> Page {
        let base = start / PAGE_SPAN * PAGE_SPAN;
        let reads = (1..PAGE_SPAN)
            .filter_map(|k| base.checked_add(k).map(|pos| ReadAlignment::new(pos, PAGE_SPAN - k)))
            .collect();

        let next = base
            .checked_add(PAGE_SPAN)
            .filter(|next| *next < end)
            .map(|next| Cursor::new(format!("{next}:{end}")));
        Page::new(reads, next)
    }
}

impl ReadSource for MockReadSource {
    fn fetch_page(&mut self, locus: &SourceLocus, cursor: Option<&Cursor>) -> Result<Page, ApiError> {
        let (start, end) = match cursor {
            Some(cursor) => Self::parse_cursor(cursor)?,
            None => (locus.start(), locus.end()),
        };
        Ok(Self::page(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use readcov_core_rs::source::{Pager, Step};

    fn locus(start: u64, end: u64) -> SourceLocus {
        SourceLocus::try_from(("chr1".to_string(), start, end)).unwrap()
    }

    #[test]
    fn test_single_page() {
        let page = MockReadSource.fetch_page(&locus(68101, 68200), None).unwrap();
        assert_eq!(page.reads().len(), 99);
        assert_eq!(page.reads()[0], ReadAlignment::new(68101, 99));
        assert_eq!(page.reads()[98], ReadAlignment::new(68199, 1));
        assert!(page.is_last());

        // Position 68164 is covered by the reads starting at 68101..=68164
        let covering = page
            .reads()
            .iter()
            .filter(|read| read.covered().is_some_and(|x| x.contains(68164)))
            .count();
        assert_eq!(covering, 64);
    }

    #[test]
    fn test_rounds_down() {
        let page = MockReadSource.fetch_page(&locus(68199, 68199), None).unwrap();
        assert_eq!(page.reads()[0].position, 68101);
        assert!(page.is_last());
    }

    #[test]
    fn test_pagination() {
        let mut source = MockReadSource::new();
        let mut pager = Pager::new(locus(0, 250));

        let mut cursors = Vec::new();
        let mut starts = Vec::new();
        while let Step::Page(page) = pager.advance(&mut source) {
            starts.push(page.reads()[0].position);
            cursors.push(page.next_cursor().as_ref().map(|x| x.to_string()));
        }
        assert_eq!(starts, vec![1, 101, 201]);
        assert_eq!(
            cursors,
            vec![Some("100:250".to_string()), Some("200:250".to_string()), None]
        );
    }

    #[test]
    fn test_deterministic() {
        let first = MockReadSource.fetch_page(&locus(123, 4567), None).unwrap();
        let second = MockReadSource.fetch_page(&locus(123, 4567), None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_cursor() {
        for token in ["garbage", "1:", ":2", "a:b"] {
            let err = MockReadSource
                .fetch_page(&locus(0, 10), Some(&Cursor::from(token)))
                .unwrap_err();
            assert!(matches!(err, ApiError::BadRequest(_)), "{token}");
        }
    }

    proptest! {
        #[test]
        fn reads_stay_inside_their_block(start in 0u64..10_000_000, length in 1u64..1_000) {
            let end = start + length - 1;
            let page = MockReadSource.fetch_page(&locus(start, end), None).unwrap();

            let base = start / PAGE_SPAN * PAGE_SPAN;
            for read in page.reads() {
                let covered = read.covered().unwrap();
                prop_assert!(covered.start() > base);
                prop_assert_eq!(covered.end(), base + PAGE_SPAN - 1);
            }
            prop_assert_eq!(page.is_last(), base + PAGE_SPAN >= end);
        }
    }
}
