use derive_getters::Dissolve;
use derive_more::{Constructor, Display, From};
use eyre::{Context, OptionExt, Result};

/// Number of reads covering a single position.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Constructor, Dissolve, Display, From,
)]
#[display("{position}: {count}")]
pub struct Record {
    pub position: u64,
    pub count: u64,
}

impl Record {
    /// Parse a single line without the trailing newline. Leading zeros in the position are allowed.
    pub fn parse(line: &str) -> Result<Self> {
        let (position, count) = line
            .split_once(':')
            .ok_or_eyre("Coverage record must have the form `<position>: <count>`")?;

        let position = position
            .trim()
            .parse::<u64>()
            .wrap_err_with(|| format!("Invalid coverage position: {line:?}"))?;
        let count = count
            .trim()
            .parse::<u64>()
            .wrap_err_with(|| format!("Invalid coverage count: {line:?}"))?;
        Ok(Self { position, count })
    }
}

impl From<Record> for (u64, u64) {
    fn from(record: Record) -> Self {
        (record.position, record.count)
    }
}
