//! Terminal User Interface module.
//!
//! One article is shown at a time as a full-screen card.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - Layout and size checks
//! - `helpers` - Task spawning shared by input and the loop
//! - `card` - Article card widget
//! - `status` - Status bar widget
//! - `help` - Key overlay

mod card;
mod events;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod status;

// Re-export the public API
pub use loop_runner::{run, Action};
