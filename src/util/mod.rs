//! Small helpers shared by the UI and the link opener.
//!
//! - **Text**: control-character stripping and width-aware truncation for
//!   drawing third-party text in a terminal
//! - **URL validation**: checks applied before a link reaches the system opener

mod text;
mod url_validator;

pub use text::{display_width, strip_control_chars, trim_truncation_marker, truncate_to_width};
pub use url_validator::{validate_url_for_open, UrlValidationError};
