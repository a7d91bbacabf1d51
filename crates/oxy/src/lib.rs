//! **oxy** -- keyboard-accessible single-selection widgets.
//!
//! This is the umbrella crate that re-exports everything you need from a
//! single dependency:
//!
//! * All public items from [`oxy_core`] are available at the crate root
//!   ([`Document`], [`Event`], [`HostController`], etc.).
//! * The [`widgets`] module re-exports everything from [`oxy_widgets`]
//!   (buttons, radios, radio groups, tabs).
//! * [`Driver`] feeds `crossterm` input into a document, and
//!   [`logging::log_to_file`] sends `tracing` output to a file.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use oxy::widgets::{Radio, RadioGroup};
//! use oxy::{Document, Driver};
//!
//! let mut doc = Document::new();
//! let group = RadioGroup::create(&mut doc)?;
//! for _ in 0..3 {
//!     let radio = Radio::create(&mut doc)?;
//!     doc.append_child(group.node(), radio.node())?;
//! }
//! let root = doc.root();
//! doc.append_child(root, group.node())?;
//!
//! let mut driver = Driver::new(doc);
//! driver.run(crossterm::event::EventStream::new()).await?;
//! ```

pub mod driver;
pub mod logging;

pub use driver::{Driver, DriverError, DriverOptions, HitTest};
pub use oxy_core::*;
pub mod widgets {
    pub use oxy_widgets::*;
}

// Re-export for downstream crates that build their own event sources
pub use crossterm;
