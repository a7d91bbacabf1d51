//! Tab bar that keeps exactly one direct child selected, by index.
//!
//! ```text
//! <oxy-tabs selected="0">
//!   <oxy-tab selectable>Pizza</oxy-tab>
//!   <oxy-tab selectable>Pasta</oxy-tab>
//! </oxy-tabs>
//! ```
//!
//! Unlike [`RadioGroup`](crate::radio_group::RadioGroup) the tab bar owns
//! its state: the `selected` attribute holds the index, and the bar writes
//! `selected` and `orientation` down onto its direct children.  Clicks
//! anywhere inside a child select that child.

use crate::attr::{DISABLED, ORIENTATION, ROLE, SELECTABLE, SELECTED};
use oxy_core::{
    AttributeChange, Document, DomError, Event, EventType, HostController, ListenerId, NodeId,
};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use tracing::debug;

/// Layout direction of a tab bar, propagated to every tab.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an orientation other than `horizontal`/`vertical`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown orientation {0:?}")]
pub struct UnknownOrientation(pub String);

impl FromStr for Orientation {
    type Err = UnknownOrientation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(Orientation::Horizontal),
            "vertical" => Ok(Orientation::Vertical),
            other => Err(UnknownOrientation(other.to_string())),
        }
    }
}

/// A tab bar coordinating its direct children.
///
/// Fires a non-bubbling `Change(None)` whenever the selected index changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tabs {
    node: NodeId,
}

impl Tabs {
    pub const TAG: &'static str = "oxy-tabs";

    /// Create a detached, horizontal tab bar with its first tab selected.
    pub fn create(doc: &mut Document) -> Result<Self, DomError> {
        let node = doc.create_element(Self::TAG);
        Self::upgrade(doc, node)
    }

    /// Make an existing element coordinate its direct children.
    ///
    /// An element without a `selected` index starts at index 0.
    pub fn upgrade(doc: &mut Document, node: NodeId) -> Result<Self, DomError> {
        if doc.is_element(node) && !doc.has_attribute(node, SELECTED) {
            doc.set_attribute(node, SELECTED, "0");
        }
        doc.add_controller(node, Rc::new(TabsBehavior::default()))?;
        doc.set_attribute(node, ROLE, "tablist");
        if !doc.has_attribute(node, ORIENTATION) {
            doc.set_attribute(node, ORIENTATION, Orientation::default().as_str());
        }
        Ok(Self { node })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Direct element children, in order.
    pub fn tabs(&self, doc: &Document) -> Vec<NodeId> {
        doc.element_children(self.node)
    }

    /// The selected index, `None` after [`clear_selection`](Tabs::clear_selection).
    ///
    /// The index may be out of range, in which case no child is selected.
    pub fn selected_index(&self, doc: &Document) -> Option<i64> {
        parse_index(doc.attribute(self.node, SELECTED))
    }

    pub fn set_selected_index(&self, doc: &mut Document, index: i64) {
        doc.set_attribute(self.node, SELECTED, &index.to_string());
    }

    /// Return to the no-selection state.
    pub fn clear_selection(&self, doc: &mut Document) {
        doc.remove_attribute(self.node, SELECTED);
    }

    /// The child currently carrying `selected`.
    pub fn selected_tab(&self, doc: &Document) -> Option<NodeId> {
        self.tabs(doc)
            .into_iter()
            .find(|&c| doc.has_attribute(c, SELECTED))
    }

    pub fn orientation(&self, doc: &Document) -> Option<Orientation> {
        doc.attribute(self.node, ORIENTATION)?.parse().ok()
    }

    pub fn set_orientation(&self, doc: &mut Document, orientation: Orientation) {
        doc.set_attribute(self.node, ORIENTATION, orientation.as_str());
    }
}

fn parse_index(value: Option<&str>) -> Option<i64> {
    value?.trim().parse().ok()
}

#[derive(Default)]
struct TabsBehavior {
    click: Cell<Option<ListenerId>>,
}

impl HostController for TabsBehavior {
    fn host_connected(&self, doc: &mut Document, host: NodeId) {
        if self.click.get().is_none() {
            match doc.add_listener(host, EventType::Click, move |doc, event| {
                on_click(doc, host, event)
            }) {
                Ok(id) => self.click.set(Some(id)),
                Err(err) => debug!(%err, "tab bar could not listen for clicks"),
            }
        }
        // Children may have been added while detached.
        apply_orientation(doc, host);
        apply_selection(doc, host);
    }

    fn host_disconnected(&self, doc: &mut Document, _host: NodeId) {
        if let Some(id) = self.click.take() {
            doc.remove_listener(id);
        }
    }

    fn attribute_changed(&self, doc: &mut Document, host: NodeId, change: &AttributeChange<'_>) {
        match change.name {
            ORIENTATION => apply_orientation(doc, host),
            SELECTED => {
                apply_selection(doc, host);
                doc.dispatch(host, Event::change(None));
            }
            _ => {}
        }
    }
}

/// Resolve a click target to the direct child of `tabs` that contains it.
fn direct_child_containing(doc: &Document, tabs: NodeId, target: NodeId) -> Option<NodeId> {
    let mut current = target;
    loop {
        let parent = doc.parent(current)?;
        if parent == tabs {
            return Some(current);
        }
        current = parent;
    }
}

fn on_click(doc: &mut Document, tabs: NodeId, event: &mut Event) {
    let Some(child) = direct_child_containing(doc, tabs, event.target) else {
        return;
    };
    if !doc.has_attribute(child, SELECTABLE) || doc.has_attribute(child, DISABLED) {
        debug!(?child, "ignoring click on unselectable tab");
        return;
    }
    let Some(index) = doc.element_children(tabs).iter().position(|&c| c == child) else {
        return;
    };
    doc.set_attribute(tabs, SELECTED, &index.to_string());
}

fn apply_selection(doc: &mut Document, tabs: NodeId) {
    let index = parse_index(doc.attribute(tabs, SELECTED));
    for (i, child) in doc.element_children(tabs).into_iter().enumerate() {
        let selected = index.is_some_and(|index| usize::try_from(index) == Ok(i));
        doc.toggle_attribute(child, SELECTED, selected);
    }
}

fn apply_orientation(doc: &mut Document, tabs: NodeId) {
    let value = doc.attribute(tabs, ORIENTATION).map(str::to_string);
    for child in doc.element_children(tabs) {
        match &value {
            Some(value) => doc.set_attribute(child, ORIENTATION, value),
            None => doc.remove_attribute(child, ORIENTATION),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab::Tab;
    use crossterm::event::KeyCode;
    use oxy_core::testing::{tap, EventRecorder};
    use oxy_core::SPACE;

    fn tab_bar(doc: &mut Document, count: usize) -> (Tabs, Vec<Tab>) {
        let tabs = Tabs::create(doc).unwrap();
        let children: Vec<Tab> = (0..count)
            .map(|_| {
                let tab = Tab::create(doc).unwrap();
                doc.append_child(tabs.node(), tab.node()).unwrap();
                tab
            })
            .collect();
        let root = doc.root();
        doc.append_child(root, tabs.node()).unwrap();
        (tabs, children)
    }

    fn selected_flags(doc: &Document, tabs: &[Tab]) -> Vec<bool> {
        tabs.iter().map(|t| t.is_selected(doc)).collect()
    }

    #[test]
    fn starts_with_first_tab_selected() {
        let mut doc = Document::new();
        let (tabs, children) = tab_bar(&mut doc, 3);
        assert_eq!(tabs.selected_index(&doc), Some(0));
        assert_eq!(selected_flags(&doc, &children), vec![true, false, false]);
        assert_eq!(doc.attribute(tabs.node(), ROLE), Some("tablist"));

        tabs.clear_selection(&mut doc);
        assert_eq!(tabs.selected_index(&doc), None);
        assert_eq!(selected_flags(&doc, &children), vec![false; 3]);
    }

    #[test]
    fn upgrade_keeps_an_existing_index() {
        let mut doc = Document::new();
        let node = doc.create_element("div");
        doc.set_attribute(node, SELECTED, "2");
        let tabs = Tabs::upgrade(&mut doc, node).unwrap();
        assert_eq!(tabs.selected_index(&doc), Some(2));
    }

    #[test]
    fn programmatic_index_selects_exactly_one() {
        let mut doc = Document::new();
        let (tabs, children) = tab_bar(&mut doc, 4);
        for i in 0..4 {
            tabs.set_selected_index(&mut doc, i);
            let expected: Vec<bool> = (0..4).map(|j| j == i).collect();
            assert_eq!(selected_flags(&doc, &children), expected);
            assert_eq!(tabs.selected_tab(&doc), Some(children[i as usize].node()));
        }
    }

    #[test]
    fn out_of_range_selects_nothing() {
        let mut doc = Document::new();
        let (tabs, children) = tab_bar(&mut doc, 2);
        tabs.set_selected_index(&mut doc, 1);
        tabs.set_selected_index(&mut doc, 7);
        assert_eq!(selected_flags(&doc, &children), vec![false, false]);
        tabs.set_selected_index(&mut doc, -1);
        assert_eq!(selected_flags(&doc, &children), vec![false, false]);
        assert_eq!(tabs.selected_index(&doc), Some(-1));

        tabs.set_selected_index(&mut doc, 0);
        tabs.clear_selection(&mut doc);
        assert_eq!(selected_flags(&doc, &children), vec![false, false]);
    }

    #[test]
    fn click_on_nested_span_selects_its_tab() {
        let mut doc = Document::new();
        let (tabs, children) = tab_bar(&mut doc, 3);
        let span = doc.create_element("span");
        doc.append_child(children[1].node(), span).unwrap();
        let changes = EventRecorder::attach(&mut doc, tabs.node(), EventType::Change).unwrap();

        doc.click(span);
        assert_eq!(tabs.selected_index(&doc), Some(1));
        assert_eq!(selected_flags(&doc, &children), vec![false, true, false]);
        assert_eq!(changes.count(), 1);
    }

    #[test]
    fn index_counts_only_element_children() {
        let mut doc = Document::new();
        let tabs = Tabs::create(&mut doc).unwrap();
        let text = doc.create_text("\n  ");
        doc.append_child(tabs.node(), text).unwrap();
        let tab = Tab::create(&mut doc).unwrap();
        doc.append_child(tabs.node(), tab.node()).unwrap();
        let root = doc.root();
        doc.append_child(root, tabs.node()).unwrap();

        doc.click(tab.node());
        assert_eq!(tabs.selected_index(&doc), Some(0));
        assert!(tab.is_selected(&doc));
    }

    #[test]
    fn unselectable_and_disabled_tabs_ignore_clicks() {
        let mut doc = Document::new();
        let (tabs, children) = tab_bar(&mut doc, 3);
        tabs.set_selected_index(&mut doc, 0);
        children[1].set_selectable(&mut doc, false);
        children[2].set_disabled(&mut doc, true);
        let changes = EventRecorder::attach(&mut doc, tabs.node(), EventType::Change).unwrap();

        doc.click(children[1].node());
        doc.click(children[2].node());
        assert_eq!(tabs.selected_index(&doc), Some(0));
        assert_eq!(changes.count(), 0);
    }

    #[test]
    fn click_outside_any_child_is_ignored() {
        let mut doc = Document::new();
        let (tabs, children) = tab_bar(&mut doc, 2);
        doc.click(tabs.node());
        let root = doc.root();
        doc.click(root);
        assert_eq!(tabs.selected_index(&doc), Some(0));
        assert_eq!(selected_flags(&doc, &children), vec![true, false]);
    }

    #[test]
    fn orientation_propagates_to_every_child_synchronously() {
        let mut doc = Document::new();
        let (tabs, children) = tab_bar(&mut doc, 3);
        let plain = doc.create_element("div");
        doc.append_child(tabs.node(), plain).unwrap();

        tabs.set_orientation(&mut doc, Orientation::Vertical);
        for tab in &children {
            assert_eq!(tab.orientation(&doc), Some(Orientation::Vertical));
        }
        assert_eq!(doc.attribute(plain, ORIENTATION), Some("vertical"));
        assert_eq!(tabs.orientation(&doc), Some(Orientation::Vertical));
    }

    #[test]
    fn connecting_applies_state_to_children_added_while_detached() {
        let mut doc = Document::new();
        let tabs = Tabs::create(&mut doc).unwrap();
        tabs.set_orientation(&mut doc, Orientation::Vertical);
        tabs.set_selected_index(&mut doc, 1);
        let children: Vec<Tab> = (0..2)
            .map(|_| {
                let tab = Tab::create(&mut doc).unwrap();
                doc.append_child(tabs.node(), tab.node()).unwrap();
                tab
            })
            .collect();

        let root = doc.root();
        doc.append_child(root, tabs.node()).unwrap();
        assert_eq!(selected_flags(&doc, &children), vec![false, true]);
        assert_eq!(children[0].orientation(&doc), Some(Orientation::Vertical));
    }

    #[test]
    fn keyboard_activation_selects_focused_tab() {
        let mut doc = Document::new();
        let (tabs, children) = tab_bar(&mut doc, 3);
        tap(&mut doc, children[2].node(), KeyCode::Enter);
        assert_eq!(tabs.selected_index(&doc), Some(2));
        tap(&mut doc, children[0].node(), SPACE);
        assert_eq!(tabs.selected_index(&doc), Some(0));
        assert_eq!(selected_flags(&doc, &children), vec![true, false, false]);
    }

    #[test]
    fn does_not_recurse_into_grandchildren() {
        let mut doc = Document::new();
        let (tabs, children) = tab_bar(&mut doc, 1);
        let grandchild = Tab::create(&mut doc).unwrap();
        doc.append_child(children[0].node(), grandchild.node()).unwrap();

        tabs.set_selected_index(&mut doc, 0);
        tabs.set_orientation(&mut doc, Orientation::Vertical);
        assert!(children[0].is_selected(&doc));
        assert!(!grandchild.is_selected(&doc));
        assert_eq!(grandchild.orientation(&doc), Some(Orientation::Horizontal));
    }

    #[test]
    fn orientation_round_trips_through_strings() {
        assert_eq!("vertical".parse::<Orientation>(), Ok(Orientation::Vertical));
        assert_eq!(Orientation::Horizontal.to_string(), "horizontal");
        let err = "sideways".parse::<Orientation>().unwrap_err();
        assert_eq!(err, UnknownOrientation("sideways".to_string()));
        assert_eq!(err.to_string(), "unknown orientation \"sideways\"");
        let _: &dyn std::error::Error = &err;
    }
}
