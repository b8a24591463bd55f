//! Application-level orchestration.
//!
//! This module owns the submission pipeline (validate, build paths, fetch, render)
//! and the event loop that routes form events into it. Presentation layers only
//! send events and draw the shared document.

mod controller;
mod listeners;

pub(crate) use controller::SearchController;
pub(crate) use listeners::{attach_listeners, UiEvent, UiUpdate};
