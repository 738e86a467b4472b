//! List thoughts

use anyhow::Result;

use crate::content::PostRecord;
use crate::helpers::format_date;
use crate::Site;

/// Print every thought, newest first
pub fn run(site: &Site, json: bool) -> Result<()> {
    let posts = site.repository().list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
        return Ok(());
    }

    print!("{}", format_listing(&posts));
    Ok(())
}

/// One line per thought: date, identifier, title and tags
pub fn format_listing(posts: &[PostRecord]) -> String {
    let mut out = format!("Thoughts ({}):\n", posts.len());
    for post in posts {
        let date = post
            .published_at
            .as_ref()
            .map(|d| format_date(d, "%Y-%m-%d"))
            .unwrap_or_else(|| "----------".to_string());
        out.push_str(&format!("  {} - {} [{}]", date, post.title, post.identifier));
        if !post.tags.is_empty() {
            out.push_str(&format!(" #{}", post.tags.join(" #")));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Slug;

    #[test]
    fn test_format_listing() {
        let posts = vec![
            PostRecord::from_source(
                Slug::parse("first").unwrap(),
                "---\ntitle: First\ndate: 2024-02-03\ntags: [a, b]\n---\n",
            ),
            PostRecord::from_source(Slug::parse("second").unwrap(), ""),
        ];
        assert_eq!(
            format_listing(&posts),
            "Thoughts (2):\n  2024-02-03 - First [first] #a #b\n  ---------- - Untitled [second]\n"
        );
    }
}
