//! Core game module - states, events, and the run session.
//!
//! This module provides the foundation that all other game systems build upon.

mod events;
mod plugin;
mod session;
mod states;

pub use events::*;
pub use plugin::CorePlugin;
pub use session::{RunEnd, Session};
pub use states::*;
