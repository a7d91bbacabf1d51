//! Interactive widgets for **oxy**.
//!
//! Every widget is a thin handle around a [`oxy_core::NodeId`]: the state
//! lives in attributes on the element, and the behavior is one or more
//! [`oxy_core::HostController`]s attached to it.  Coordinators such as
//! [`RadioGroup`](radio_group::RadioGroup) never hold references to their
//! members; they react to events bubbling up from them.
//!
//! # Widgets
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`button`] | Push button with Space/Enter activation |
//! | [`radio`] | Checkable radio that announces its selection |
//! | [`radio_group`] | Keeps at most one radio checked across a subtree |
//! | [`tab`] | A single tab |
//! | [`tabs`] | Tab bar selecting one direct child by index |
//!
//! # Utilities
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`keyboard`] | [`KeyboardController`](keyboard::KeyboardController) mapping keys to press state and clicks |
//! | [`attr`] | Shared attribute names |

pub mod attr;
pub mod button;
pub mod keyboard;
pub mod radio;
pub mod radio_group;
pub mod tab;
pub mod tabs;

pub use button::Button;
pub use keyboard::{HostActions, KeyboardController};
pub use radio::Radio;
pub use radio_group::RadioGroup;
pub use tab::Tab;
pub use tabs::{Orientation, Tabs};
