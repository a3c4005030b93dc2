//! Core types for directory listings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transport a listed server speaks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Local process via stdio
    Stdio,
    /// Remote server via Streamable HTTP
    Http,
    /// Server ships both transports
    Both,
}

impl Transport {
    /// All accepted values, in declaration order
    pub const VALUES: &'static [&'static str] = &["stdio", "http", "both"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Http => "http",
            Self::Both => "both",
        }
    }
}

impl FromStr for Transport {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdio" => Ok(Self::Stdio),
            "http" => Ok(Self::Http),
            "both" => Ok(Self::Both),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authentication a listed server requires
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AuthKind {
    /// No authentication required
    None,
    /// OAuth 2.0/2.1
    Oauth,
    /// API key or token
    ApiKey,
    /// Anything else (mTLS, custom headers, ...)
    Other,
}

impl AuthKind {
    /// All accepted values, in declaration order
    pub const VALUES: &'static [&'static str] = &["none", "oauth", "api_key", "other"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Oauth => "oauth",
            Self::ApiKey => "api_key",
            Self::Other => "other",
        }
    }
}

impl FromStr for AuthKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "oauth" => Ok(Self::Oauth),
            "api_key" => Ok(Self::ApiKey),
            "other" => Ok(Self::Other),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

impl fmt::Display for AuthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known enum variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant '{0}'")]
pub struct UnknownVariant(pub String);

/// MCP feature families a server advertises
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Capabilities {
    #[serde(default)]
    pub tools: bool,
    #[serde(default)]
    pub resources: bool,
    #[serde(default)]
    pub prompts: bool,
}
