use std::fmt;

use crate::model::ItemIdentity;

/// Which snapshot a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Baseline,
    Current,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Baseline => "baseline",
            Side::Current => "current",
        }
    }
}

/// One identity that occurs more than once within a single snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateIdentity {
    pub side: Side,
    pub identity: ItemIdentity,
    pub count: usize,
}

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (threshold ordering, etc.).
    ConfigValidation(String),
    /// Mapped header missing from a snapshot CSV.
    MissingColumn { column: String },
    /// Price or count that is not a non-negative number. `row` is 1-based, header excluded.
    MalformedRecord { row: usize, field: String, value: String },
    /// The same identity appears more than once within one snapshot.
    DuplicateIdentity(Vec<DuplicateIdentity>),
    /// Value arithmetic for an item left the `i64` cents range.
    ValueOverflow { identity: ItemIdentity },
    /// Card metadata JSON could not be parsed.
    LibraryParse(String),
    /// IO error (file read, CSV framing, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { column } => write!(f, "snapshot is missing column '{column}'"),
            Self::MalformedRecord { row, field, value } => {
                write!(f, "row {row}: cannot parse {field} '{value}'")
            }
            Self::DuplicateIdentity(dups) => {
                writeln!(f, "duplicate identities found:")?;
                for dup in dups {
                    writeln!(f, "  {} {} appears {} times", dup.side.as_str(), dup.identity, dup.count)?;
                }
                Ok(())
            }
            Self::ValueOverflow { identity } => {
                write!(f, "value of {identity} is out of range (count × price overflows)")
            }
            Self::LibraryParse(msg) => write!(f, "card library parse error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
