use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Display, Clone, PartialEq)]
pub enum SError {
    #[display("io error: {_0}")]
    IOError(String),
    #[display("parse error: {_0}")]
    ParseError(String),
    #[display("config error: {_0}")]
    ConfigError(String),
    #[display("network error: {_0}")]
    NetworkError(String),
    #[display("mod not found: {_0}")]
    ModNotFound(String),
    #[display("provide folder id, codename, or ALL")]
    InvalidSelector,
    #[display("not a mod folder name: {_0:?}")]
    InvalidFolder(String),
    #[display("holding slot already occupied: {_0}")]
    HoldingOccupied(String),
    #[display("cross-device copy declined by operator")]
    CopyDeclined,
    #[display("failed to launch {_0}")]
    LaunchFailed(String),
    #[display("runtime error: {_0}")]
    AsyncRuntimeError(String),
    #[display("unexpected: {_0}")]
    Unexpected(String),
}

impl std::error::Error for SError {}

impl From<std::io::Error> for SError {
    fn from(e: std::io::Error) -> Self {
        SError::IOError(e.to_string())
    }
}

impl From<walkdir::Error> for SError {
    fn from(e: walkdir::Error) -> Self {
        SError::IOError(e.to_string())
    }
}

impl From<std::path::StripPrefixError> for SError {
    fn from(e: std::path::StripPrefixError) -> Self {
        SError::Unexpected(e.to_string())
    }
}

impl From<camino::FromPathBufError> for SError {
    fn from(e: camino::FromPathBufError) -> Self {
        SError::ParseError(format!("invalid UTF-8 path: {}", e.as_path().display()))
    }
}

impl From<toml::de::Error> for SError {
    fn from(e: toml::de::Error) -> Self {
        SError::ParseError(e.to_string())
    }
}

impl From<toml::ser::Error> for SError {
    fn from(e: toml::ser::Error) -> Self {
        SError::ParseError(e.to_string())
    }
}

impl From<serde_json::Error> for SError {
    fn from(e: serde_json::Error) -> Self {
        SError::ParseError(e.to_string())
    }
}

impl From<confy::ConfyError> for SError {
    fn from(e: confy::ConfyError) -> Self {
        SError::ConfigError(e.to_string())
    }
}

impl From<ureq::Error> for SError {
    fn from(e: ureq::Error) -> Self {
        SError::NetworkError(e.to_string())
    }
}
