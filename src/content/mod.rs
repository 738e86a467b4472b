//! Content module - thoughts, their front-matter and their bodies

mod error;
mod frontmatter;
pub mod markdown;
mod post;
pub mod render;
pub mod repository;

pub use error::ContentError;
pub use frontmatter::{parse_date_string, FrontMatter};
pub use markdown::{Document, LinkKind, Node};
pub use post::{PostDefaults, PostRecord, Slug, CONTENT_EXTENSION};
pub use render::{render_body, render_html};
pub use repository::PostRepository;
