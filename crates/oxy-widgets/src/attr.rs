//! Attribute names shared by the widgets, and the accessibility mirrors
//! derived from them.

use oxy_core::{Document, NodeId};

pub const DISABLED: &str = "disabled";
pub const ACTIVE: &str = "active";
pub const CHECKED: &str = "checked";
pub const SELECTED: &str = "selected";
pub const SELECTABLE: &str = "selectable";
pub const ORIENTATION: &str = "orientation";
pub const ROLE: &str = "role";
pub const TABINDEX: &str = "tabindex";
pub const ARIA_DISABLED: &str = "aria-disabled";
pub const ARIA_CHECKED: &str = "aria-checked";
pub const ARIA_SELECTED: &str = "aria-selected";

/// Set `aria-disabled="true"` while `disabled` is present, remove it otherwise.
pub(crate) fn mirror_disabled(doc: &mut Document, host: NodeId) {
    if doc.has_attribute(host, DISABLED) {
        doc.set_attribute(host, ARIA_DISABLED, "true");
    } else {
        doc.remove_attribute(host, ARIA_DISABLED);
    }
}

/// Write `"true"`/`"false"` into `aria` according to the presence of `source`.
pub(crate) fn mirror_boolean(doc: &mut Document, host: NodeId, source: &str, aria: &str) {
    let value = if doc.has_attribute(host, source) {
        "true"
    } else {
        "false"
    };
    doc.set_attribute(host, aria, value);
}

/// Give a freshly rendered widget its role and make it focusable.
pub(crate) fn render_focusable(doc: &mut Document, host: NodeId, role: &str) {
    doc.set_attribute(host, TABINDEX, "0");
    doc.set_attribute(host, ROLE, role);
}
