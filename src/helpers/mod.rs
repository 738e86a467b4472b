//! Helper functions for views
//!
//! Small building blocks shared by the body renderer and the page
//! templates: escaping, URLs and date formatting.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
