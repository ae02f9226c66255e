use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire id of the transfer-credit bucket.
pub const TRANSFER_BUCKET_ID: &str = "transfer-credits";

/// Wire id a drop surface may use for the available-course pool.
pub const POOL_ID: &str = "pool";

/// Where a course currently lives in a roadmap.
///
/// The string forms only exist at the boundary: drop-target ids coming from
/// the interaction surface and the `semesterId` field of persisted records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Container {
    /// Not placed anywhere; shows up in the derived pool.
    #[default]
    Pool,
    /// A semester, by its `{year}-{term}` id.
    Semester(String),
    /// The flat bucket of externally earned credits.
    TransferBucket,
}

impl Container {
    pub fn semester(id: impl Into<String>) -> Self {
        Self::Semester(id.into())
    }

    /// Parse a drop-target or `semesterId` string.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "" | POOL_ID => Self::Pool,
            TRANSFER_BUCKET_ID => Self::TransferBucket,
            id => Self::Semester(id.to_string()),
        }
    }

    pub fn as_semester(&self) -> Option<&str> {
        match self {
            Self::Semester(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_pool(&self) -> bool {
        matches!(self, Self::Pool)
    }
}

impl From<String> for Container {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Container> for String {
    fn from(container: Container) -> Self {
        match container {
            Container::Pool => String::new(),
            Container::Semester(id) => id,
            Container::TransferBucket => TRANSFER_BUCKET_ID.to_string(),
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pool => f.write_str(POOL_ID),
            Self::Semester(id) => f.write_str(id),
            Self::TransferBucket => f.write_str(TRANSFER_BUCKET_ID),
        }
    }
}
