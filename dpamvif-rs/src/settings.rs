//! Port settings index built from a DPAM settings document.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::constants::{component_name, optional_content_name, port_label_name, NO_LABEL_KEY};
use crate::error::{Error, Result};
use crate::node::{descendants, element_text, find_child, find_descendant, NodeRef};

/// Maps port labels to their `OptionalContent` subtree in the settings
/// document.
///
/// Settings components without a `Port_Label` land under the `"NA"` key,
/// which also serves as the fallback for unlabeled target ports. A key can
/// map to `None`: the settings component existed but carried no optional
/// content. When several components produce the same key, the last one in
/// document order wins.
pub struct PortSettingsIndex {
    entries: FxHashMap<String, Option<NodeRef>>,
}

impl PortSettingsIndex {
    /// Builds the index by scanning every `vif:Component` in the settings
    /// tree, at any depth, in document order.
    pub fn from_settings(settings_root: &NodeRef) -> Self {
        let label_name = port_label_name();
        let content_name = optional_content_name();

        let mut entries = FxHashMap::default();
        for component in descendants(settings_root, &component_name()) {
            let key = match find_child(&component, &label_name) {
                Some(label) => element_text(&label).unwrap_or_default(),
                None => NO_LABEL_KEY.to_string(),
            };
            // The content may sit anywhere under the component, not only as
            // a direct child. Absent content is a valid entry.
            let content = find_descendant(&component, &content_name);
            debug!(
                port = %key,
                has_content = content.is_some(),
                "indexed settings component"
            );
            entries.insert(key, content);
        }

        PortSettingsIndex { entries }
    }

    /// Looks up the settings content for a port label.
    ///
    /// A missing entry is a hard error: the settings document is expected
    /// to cover every port in the target VIF.
    pub fn lookup(&self, label: &str) -> Result<Option<&NodeRef>> {
        match self.entries.get(label) {
            Some(content) => Ok(content.as_ref()),
            None => Err(Error::SettingsLookup(label.to_string())),
        }
    }

    /// Returns true if a label has an entry (even one without content).
    pub fn contains_label(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    /// Returns the number of indexed ports.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the settings document had no components.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{OPT_NS, VIF_NS};
    use crate::node::element_text;
    use crate::xml::parse_str;

    fn settings_doc(body: &str) -> NodeRef {
        let xml = format!(
            r#"<vif:VIF xmlns:vif="{}" xmlns:opt="{}">{}</vif:VIF>"#,
            VIF_NS, OPT_NS, body
        );
        parse_str(&xml).unwrap()
    }

    #[test]
    fn labeled_component_is_indexed_by_label() {
        let root = settings_doc(
            "<vif:Component><vif:Port_Label>PORT_A</vif:Port_Label>\
             <opt:OptionalContent><opt:Wired /></opt:OptionalContent></vif:Component>",
        );
        let index = PortSettingsIndex::from_settings(&root);

        assert_eq!(index.len(), 1);
        let content = index.lookup("PORT_A").unwrap().unwrap();
        let borrowed = content.borrow();
        assert_eq!(
            borrowed.content().as_element().unwrap().qname(),
            "opt:OptionalContent"
        );
    }

    #[test]
    fn unlabeled_component_lands_under_na() {
        let root = settings_doc(
            "<vif:Component><opt:OptionalContent /></vif:Component>",
        );
        let index = PortSettingsIndex::from_settings(&root);

        assert!(index.contains_label(NO_LABEL_KEY));
        assert!(index.lookup(NO_LABEL_KEY).unwrap().is_some());
    }

    #[test]
    fn content_found_at_any_depth() {
        let root = settings_doc(
            "<vif:Component><vif:Port_Label>P</vif:Port_Label>\
             <vif:Wrapper><opt:OptionalContent><opt:X /></opt:OptionalContent></vif:Wrapper>\
             </vif:Component>",
        );
        let index = PortSettingsIndex::from_settings(&root);
        assert!(index.lookup("P").unwrap().is_some());
    }

    #[test]
    fn missing_content_is_a_valid_entry() {
        let root = settings_doc(
            "<vif:Component><vif:Port_Label>BARE</vif:Port_Label></vif:Component>",
        );
        let index = PortSettingsIndex::from_settings(&root);

        assert!(index.contains_label("BARE"));
        assert!(index.lookup("BARE").unwrap().is_none());
    }

    #[test]
    fn lookup_miss_is_an_error() {
        let root = settings_doc("");
        let index = PortSettingsIndex::from_settings(&root);

        let err = index.lookup("GHOST").unwrap_err();
        assert!(matches!(err, Error::SettingsLookup(label) if label == "GHOST"));
    }

    #[test]
    fn duplicate_unlabeled_components_keep_the_last() {
        let root = settings_doc(
            "<vif:Component><opt:OptionalContent><opt:First /></opt:OptionalContent></vif:Component>\
             <vif:Component><opt:OptionalContent><opt:Second /></opt:OptionalContent></vif:Component>",
        );
        let index = PortSettingsIndex::from_settings(&root);

        assert_eq!(index.len(), 1);
        let content = index.lookup(NO_LABEL_KEY).unwrap().unwrap();
        let borrowed = content.borrow();
        let first_child = borrowed.children()[0].clone();
        assert_eq!(
            first_child.borrow().content().as_element().unwrap().qname(),
            "opt:Second"
        );
    }

    #[test]
    fn labeled_entry_without_content_overwrites_earlier_same_label() {
        let root = settings_doc(
            "<vif:Component><vif:Port_Label>P</vif:Port_Label>\
             <opt:OptionalContent /></vif:Component>\
             <vif:Component><vif:Port_Label>P</vif:Port_Label></vif:Component>",
        );
        let index = PortSettingsIndex::from_settings(&root);
        assert!(index.lookup("P").unwrap().is_none());
    }

    #[test]
    fn empty_label_text_keys_the_empty_string() {
        let root = settings_doc(
            "<vif:Component><vif:Port_Label></vif:Port_Label>\
             <opt:OptionalContent /></vif:Component>",
        );
        let index = PortSettingsIndex::from_settings(&root);

        assert!(index.contains_label(""));
        assert!(!index.contains_label(NO_LABEL_KEY));
        // Sanity: the empty label really came from an element with no text.
        let components = descendants(&root, &component_name());
        let label = find_child(&components[0], &port_label_name()).unwrap();
        assert_eq!(element_text(&label), None);
    }
}
