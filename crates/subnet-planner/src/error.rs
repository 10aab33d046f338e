//! Error types for CIDR arithmetic and subnet planning

use crate::models::IpVersion;
use thiserror::Error;

/// Result type for planner operations
pub type Result<T> = std::result::Result<T, Error>;

/// Subnet planner errors
///
/// Malformed input and bounds violations surface here. Capacity exhaustion
/// never does: sizing queries clamp and report the best achievable value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    // Address errors
    #[error("Invalid {version} address: {text:?}")]
    InvalidAddress { text: String, version: IpVersion },

    // CIDR errors
    #[error("Invalid CIDR: {0}")]
    InvalidCidr(String),

    #[error("Prefix length /{prefix} is out of range for {version}")]
    PrefixOutOfRange { prefix: u32, version: IpVersion },

    #[error("Prefix length /{requested} is shorter than the current /{current}")]
    PrefixTooShort { requested: u8, current: u8 },

    #[error("CIDR {0} has no parent")]
    NoParent(String),

    #[error("Range starting at {start} with prefix /{prefix} overflows the {version} address space")]
    RangeOverflow {
        start: u128,
        prefix: u8,
        version: IpVersion,
    },

    #[error("Dividing {cidr} into /{prefix} yields more than {limit} subnets")]
    TooManySubnets {
        cidr: String,
        prefix: u8,
        limit: usize,
    },

    #[error("IP version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        expected: IpVersion,
        found: IpVersion,
    },

    // General errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ipnet::PrefixLenError> for Error {
    fn from(e: ipnet::PrefixLenError) -> Self {
        Error::InvalidCidr(e.to_string())
    }
}

impl From<std::net::AddrParseError> for Error {
    fn from(e: std::net::AddrParseError) -> Self {
        Error::InvalidCidr(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Config(e.to_string())
    }
}
