//! Output format and sink ownership

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ContractError;

/// Encoding used for a whole run
///
/// Deserializes through [`FromStr`], so an unknown name reports the accepted ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum OutputFormat {
    /// Length-delimited binary protobuf
    #[serde(rename = "proto")]
    Binary,
    /// One `label { ... }` text-format block per record
    #[serde(rename = "textproto")]
    Text,
    /// One JSON object per line
    #[serde(rename = "jsonproto")]
    Json,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [Self::Binary, Self::Text, Self::Json];

    /// Short name used in logs, metrics and configuration
    pub const fn name(self) -> &'static str {
        match self {
            Self::Binary => "proto",
            Self::Text => "textproto",
            Self::Json => "jsonproto",
        }
    }

    /// Who closes the sink when the channel is closed, unless overridden
    pub const fn default_ownership(self) -> SinkOwnership {
        match self {
            Self::Binary => SinkOwnership::Retain,
            Self::Text | Self::Json => SinkOwnership::Close,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| {
                ContractError::config_validation(
                    "output.format",
                    format!("unknown output format '{s}', expected one of proto, textproto, jsonproto"),
                )
            })
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = ContractError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

/// What happens to the sink when the channel is closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkOwnership {
    /// Flush only; the sink is handed back to the caller still open
    Retain,
    /// Flush, then close the sink
    Close,
}
