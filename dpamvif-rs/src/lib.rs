//! DPAM VIF generation.
//!
//! This library merges vendor DPAM optional-content settings into a USB-IF
//! Vendor Information File (VIF). The settings document supplies an
//! `opt:OptionalContent` block per port, keyed by `Port_Label`; the merge
//! walks the target VIF's ports and inserts, replaces, or keeps each port's
//! block, leaving every unrelated part of the document untouched.
//!
//! # Overview
//!
//! - [`xml`] parses the two documents into comment-preserving trees and
//!   serializes the merged result.
//! - [`settings::PortSettingsIndex`] maps port labels (or the `"NA"`
//!   no-label bucket) to optional-content subtrees.
//! - [`merge::merge_ports`] applies the per-port decision table, using
//!   structural equality and a containment check to avoid rewriting content
//!   that is already current.
//! - [`generator::VifGenerator`] wires the steps together behind a
//!   validated configuration and a progress sink.
//!
//! # Example
//!
//! ```no_run
//! use dpam_vif::{GeneratorConfig, VifGenerator};
//!
//! # fn main() -> dpam_vif::Result<()> {
//! let config = GeneratorConfig::builder()
//!     .input_vif("device.xml")
//!     .output_vif("device_dpam.xml")
//!     .settings("dpam_settings.xml")
//!     .build()?;
//! VifGenerator::new(config).generate()?;
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod error;
pub mod generator;
pub mod merge;
pub mod node;
pub mod progress;
pub mod settings;
pub mod xml;

// Re-export commonly used types
pub use error::{Error, Result};
pub use generator::{GeneratorConfig, GeneratorConfigBuilder, VifGenerator};
pub use merge::{contains_content, elements_equal, merge_ports};
pub use node::{
    descendants, document_element, element_text, find_child, find_descendant, new_node,
    ExpandedName, NodeInner, NodeRef, XmlComment, XmlContent, XmlElement,
};
pub use progress::{NullProgress, ProgressSink, TextProgressBar};
pub use settings::PortSettingsIndex;
pub use xml::{indent, parse_file, parse_str, print_to_string, serialize_fragment, write_document};
