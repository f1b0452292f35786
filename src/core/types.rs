use serde::{Deserialize, Serialize};
use std::fmt;

/// Node count at or below which a workflow is `basic`.
pub const BASIC_MAX_NODES: usize = 6;

/// Node count at or below which a workflow is `intermediate`.
pub const INTERMEDIATE_MAX_NODES: usize = 15;

/// Error category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    IoError,
    DecodeError,
    NotFoundError,
    WriteError,
    ValidationError,
    SerializationError,
    InternalError,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Error severity enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Error,
    Warning,
    Info,
}

/// Three-level classification derived solely from node count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Basic,
    Intermediate,
    Advanced,
}

impl Complexity {
    pub const ALL: [Complexity; 3] = [
        Complexity::Basic,
        Complexity::Intermediate,
        Complexity::Advanced,
    ];

    pub fn from_node_count(node_count: usize) -> Self {
        if node_count <= BASIC_MAX_NODES {
            Complexity::Basic
        } else if node_count <= INTERMEDIATE_MAX_NODES {
            Complexity::Intermediate
        } else {
            Complexity::Advanced
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Basic => "basic",
            Complexity::Intermediate => "intermediate",
            Complexity::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Complexity {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "basic" => Ok(Complexity::Basic),
            "intermediate" => Ok(Complexity::Intermediate),
            "advanced" => Ok(Complexity::Advanced),
            other => Err(format!("unknown complexity tier '{}'", other)),
        }
    }
}
