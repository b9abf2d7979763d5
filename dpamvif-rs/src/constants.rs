//! Constants for the DPAM VIF document dialect.
//!
//! The three namespaces are fixed for the lifetime of the system; every
//! qualified-name lookup in the settings index and the merger goes through
//! the expanded names built here.

use crate::node::namespace::ExpandedName;

/// Namespace URI of the core VIF schema (`vif` prefix).
pub const VIF_NS: &str = "http://usb.org/VendorInfoFile.xsd";

/// Namespace URI of the XML Schema instance namespace (`xsi` prefix).
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Namespace URI of the VIF optional-content schema (`opt` prefix).
pub const OPT_NS: &str = "http://usb.org/VendorInfoFileOptionalContent.xsd";

/// The prefixes conventionally bound to the three namespaces.
pub const PREFIX_MAP: [(&str, &str); 3] = [
    ("vif", VIF_NS),
    ("xsi", XSI_NS),
    ("opt", OPT_NS),
];

/// Index key for settings components without a `Port_Label`, and the
/// fallback key for target ports without one.
pub const NO_LABEL_KEY: &str = "NA";

/// Text of the comment inserted ahead of newly added optional content.
pub const NON_USB_COMMENT: &str = "Non-USB Content";

/// Default indent string for output re-indentation.
pub const XML_INDENT: &str = "  ";

/// Tag of the synthetic document root that holds top-level comments.
/// Never serialized.
pub const DOCUMENT_ROOT: &str = "$DOCUMENT$";

/// Expanded name of `vif:Component`, the per-port element.
pub fn component_name() -> ExpandedName {
    ExpandedName::new(VIF_NS, "Component")
}

/// Expanded name of `vif:Port_Label`.
pub fn port_label_name() -> ExpandedName {
    ExpandedName::new(VIF_NS, "Port_Label")
}

/// Expanded name of `opt:OptionalContent`.
pub fn optional_content_name() -> ExpandedName {
    ExpandedName::new(OPT_NS, "OptionalContent")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_names_use_the_fixed_namespaces() {
        let vif_uri = PREFIX_MAP
            .iter()
            .find(|(prefix, _)| *prefix == "vif")
            .map(|(_, uri)| *uri)
            .unwrap();
        let opt_uri = PREFIX_MAP
            .iter()
            .find(|(prefix, _)| *prefix == "opt")
            .map(|(_, uri)| *uri)
            .unwrap();

        assert_eq!(component_name().namespace_uri.as_ref(), vif_uri);
        assert_eq!(port_label_name().namespace_uri.as_ref(), vif_uri);
        assert_eq!(optional_content_name().namespace_uri.as_ref(), opt_uri);
        assert_eq!(component_name().local_name, "Component");
    }
}
