//! Generate static files

use anyhow::Result;

use crate::generator::{GenerateReport, Generator};
use crate::Site;

/// Generate the Thoughts pages into the public directory
pub fn run(site: &Site) -> Result<GenerateReport> {
    let start = std::time::Instant::now();

    let posts = site.repository().list()?;
    tracing::info!("Loaded {} thoughts", posts.len());

    let report = Generator::new(site).generate(&posts)?;

    if !report.unavailable.is_empty() {
        tracing::warn!(
            "{} thought(s) rendered as unavailable: {}",
            report.unavailable.len(),
            report.unavailable.join(", ")
        );
    }

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(report)
}
