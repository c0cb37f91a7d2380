#![forbid(unsafe_code)]

//! `sortsel-web` wires the order passes of [`sortsel_core`] into a page.
//!
//! Design goals:
//! - **Host-driven**: the embedding environment calls the lifecycle hooks and
//!   forwards pointer events; nothing here polls, blocks, or spawns.
//! - **Synchronous hooks**: `on_before_submit` finishes before it returns, so
//!   the submission that follows carries the reordered values.
//! - **Silent degradation**: no hook ever returns an error to the page.
//!
//! The host model in [`host`] (forms, selects, widget state, browser form
//! serialization) is an in-memory stand-in for the DOM, which keeps the whole
//! flow testable without a rendering surface.

pub mod config;
pub mod drag;
pub mod host;
pub mod lifecycle;
pub mod selector;

pub use config::{ConfigError, SortableConfig, SortselConfig};
pub use drag::{
    ChipDragAdapter, ChipDragDispatch, ChipDragFeedback, ChipDragIgnoredReason, ChipDragLogEntry,
    ChipDragOutcome, ChipDragPhase, ChipPressTarget, PointerButton, Propagation,
};
pub use host::{CHOSEN_CLASS, Form, FormField, Multiselect, Page};
pub use lifecycle::{ReadyReport, RestoreSkip, SelectReady, SortselRuntime, SubmitReport};
pub use selector::{PressedElement, Selector, SelectorError, SelectorTarget};
