//! Utility functions for common operations.
//!
//! - **Text processing**: stripping terminal escapes from API text
//! - **Link validation**: checking article links before opening them
//! - **Tasks**: panic capture for spawned work

mod links;
mod task;
mod text;

pub use links::{validate_link, LinkError};
pub use task::catch_task_panic;
pub use text::{single_line, strip_control_chars, truncate_to_width};
