use std::fmt;

use super::error::ProbeError;
use super::models::AssetRecord;

const NOT_BOUND: &str = "I'm not bound to an Asset Service!  Please bind me!\n";
const POSTED: &str = "I POSTed an asset to the Asset Service!\n";
const EMPTY: &str = "Oh oh... I should have gotten something back.  Something is wrong!\n";

/// Result of one `/ping` run.
///
/// `Display` renders the plain-text report returned to the caller.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// No asset binding; nothing was called.
    NotBound,
    Failed(ProbeError),
    /// The listing came back empty right after a successful POST.
    EmptyResult,
    NoMatchFound { inserted: String, count: usize },
    Matched {
        inserted: String,
        queried: String,
        count: usize,
    },
}

impl ProbeOutcome {
    /// Scan `records` in order for `inserted`; the first hit wins.
    #[must_use]
    pub fn from_listing(inserted: &str, records: &[AssetRecord]) -> Self {
        if records.is_empty() {
            return Self::EmptyResult;
        }
        match records.iter().find(|record| record.id == inserted) {
            Some(record) => Self::Matched {
                inserted: inserted.to_owned(),
                queried: record.id.clone(),
                count: records.len(),
            },
            None => Self::NoMatchFound {
                inserted: inserted.to_owned(),
                count: records.len(),
            },
        }
    }

    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

fn write_queried(f: &mut fmt::Formatter<'_>, count: usize) -> fmt::Result {
    f.write_str(POSTED)?;
    writeln!(f, "I queried Asset and got {count} assets in the response")
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotBound => f.write_str(NOT_BOUND),
            Self::Failed(err) => {
                if matches!(err, ProbeError::Query(_)) {
                    f.write_str(POSTED)?;
                }
                writeln!(f, "{err}")
            }
            Self::EmptyResult => {
                write_queried(f, 0)?;
                f.write_str(EMPTY)
            }
            Self::NoMatchFound { inserted, count } => {
                write_queried(f, *count)?;
                writeln!(
                    f,
                    "No match:  inserted: {inserted} was not among the {count} queried assets."
                )
            }
            Self::Matched {
                inserted,
                queried,
                count,
            } => {
                write_queried(f, *count)?;
                writeln!(
                    f,
                    "We have a match:  inserted: {inserted}, queried: {queried}.  :thumbsup:"
                )
            }
        }
    }
}
