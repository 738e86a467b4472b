//! Show a single thought

use anyhow::{bail, Result};

use crate::content::{markdown, ContentError};
use crate::Site;

/// Print a thought's metadata and rendered body
pub fn run(site: &Site, id: &str, html: bool) -> Result<()> {
    let Some(post) = site.repository().get(id)? else {
        bail!("Thought not found: {}", id);
    };

    println!("{}", serde_json::to_string_pretty(&post)?);

    match markdown::parse(&post.body) {
        Ok(doc) if html => println!("{}", crate::content::render_html(&doc)),
        Ok(doc) => println!("{}", doc.plain_text()),
        Err(ContentError::MalformedBody { line, message }) => {
            bail!("Body of {} is malformed at line {}: {}", id, line, message)
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
