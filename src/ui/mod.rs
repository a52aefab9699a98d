//! Terminal User Interface module.
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - Screen layout
//! - `header`, `articles`, `status` - Widgets

mod articles;
mod events;
mod header;
mod input;
mod loop_runner;
mod render;
mod status;

pub use loop_runner::{run, Action};
