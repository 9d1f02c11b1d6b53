use std::collections::hash_map::Entry;

use ahash::AHashMap;
use eyre::{eyre, Result, WrapErr};
use itertools::Itertools;
use readcov_core_rs::num::decimal_width;
use readcov_io_rs::cov::Record;

use crate::result::ConsolidatedReport;
use crate::shard_output::ShardOutput;

/// Minimal width of the zero-padded merge keys.
pub const KEY_WIDTH: usize = 9;

/// Reduce step: merge shard outputs into a single report, ascending by position.
///
/// Counts of positions listed by several outputs are summed. Positions are ordered through
/// zero-padded decimal keys at least [`KEY_WIDTH`] digits wide (wider if a position needs it), so
/// byte order and numeric order agree. The result doesn't depend on the order of `outputs`.
pub fn consolidate<'a>(
    outputs: impl IntoIterator<Item = &'a ShardOutput>,
) -> Result<ConsolidatedReport> {
    let mut totals: AHashMap<u64, u64> = AHashMap::new();
    let (mut shards, mut duplicates) = (0usize, 0usize);

    for output in outputs {
        shards += 1;
        let records = output
            .records()
            .wrap_err_with(|| format!("Failed to parse the shard output for {}", output.locus()))?;

        for Record { position, count } in records {
            match totals.entry(position) {
                Entry::Vacant(entry) => {
                    entry.insert(count);
                }
                Entry::Occupied(mut entry) => {
                    duplicates += 1;
                    let total = entry
                        .get()
                        .checked_add(count)
                        .ok_or_else(|| eyre!("Coverage overflow at position {position}"))?;
                    entry.insert(total);
                }
            }
        }
    }

    if duplicates > 0 {
        log::warn!(
            "Merged {} duplicated positions while consolidating {} shard outputs",
            duplicates,
            shards
        );
    }

    let width = totals
        .keys()
        .max()
        .map_or(KEY_WIDTH, |x| decimal_width(*x).max(KEY_WIDTH));
    let records = totals
        .into_iter()
        .map(|(position, count)| (format!("{position:0width$}"), Record::new(position, count)))
        .sorted_unstable_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, record)| record)
        .collect();

    log::debug!("Consolidated {} shard outputs ({} key digits)", shards, width);
    ConsolidatedReport::new(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::CoverageVector;
    use readcov_core_rs::loc::Interval;

    fn output(start: u64, counts: Vec<u64>) -> ShardOutput {
        let end = start + counts.len() as u64 - 1;
        let vector = CoverageVector::from_counts(Interval::new(start, end).unwrap(), counts).unwrap();
        ShardOutput::serialize("chr1", &vector)
    }

    #[test]
    fn test_consolidate() -> Result<()> {
        let outputs = [output(3, vec![5, 6]), output(0, vec![1, 2, 3])];
        let report = consolidate(&outputs)?;
        assert_eq!(report.to_text(), "0: 1\n1: 2\n2: 3\n3: 5\n4: 6\n");
        Ok(())
    }

    #[test]
    fn test_sums_duplicates() -> Result<()> {
        let outputs = [output(10, vec![1, 1, 1]), output(11, vec![2, 2])];
        let report = consolidate(&outputs)?;
        assert_eq!(
            report.iter().collect::<Vec<_>>(),
            vec![(10, 1), (11, 3), (12, 3)]
        );
        Ok(())
    }

    #[test]
    fn test_wide_positions() -> Result<()> {
        // Lexicographic order of unpadded or 9-digit keys would put 10^10 before 9 * 10^8
        let outputs = [output(10_000_000_000, vec![1]), output(900_000_000, vec![2]), output(7, vec![3])];
        let report = consolidate(&outputs)?;
        assert_eq!(
            report.iter().map(|x| x.0).collect::<Vec<_>>(),
            vec![7, 900_000_000, 10_000_000_000]
        );
        assert_eq!(report.to_text().lines().next(), Some("7: 3"));
        Ok(())
    }

    #[test]
    fn test_empty() -> Result<()> {
        assert!(consolidate([])?.is_empty());
        Ok(())
    }
}
