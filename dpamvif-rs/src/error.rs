//! Error types for DPAM VIF generation.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for DPAM VIF operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating a DPAM VIF.
///
/// Every variant is fatal to the run: the tool either writes a fully merged
/// VIF or writes nothing.
#[derive(Error, Debug)]
pub enum Error {
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// XML error from quick-xml.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input VIF document could not be loaded as well-formed XML.
    #[error("invalid input USB-IF VIF XML file at {path}: {reason}")]
    InvalidInputVif { path: PathBuf, reason: String },

    /// The DPAM settings document could not be loaded as well-formed XML.
    #[error("invalid DPAM settings XML file at {path}: {reason}")]
    InvalidSettings { path: PathBuf, reason: String },

    /// A required generator configuration field was not supplied.
    #[error("missing generator argument: {0}")]
    MissingArgument(&'static str),

    /// A port label in the target VIF has no entry in the settings index.
    #[error("no settings entry for port label {0:?}")]
    SettingsLookup(String),
}
