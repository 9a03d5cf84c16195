use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::archiver::Archive;
use crate::error::Result;
use crate::fetcher::PageFetcher;
use crate::models::ScrapedRecord;
use crate::parser::FieldExtractor;

/// Outcome counts for one pass over the input list.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub done: usize,
    pub skipped: usize,
    pub failed: usize,
    pub interrupted: bool,
}

/// Page URL for an identifier: the prefix with the identifier appended.
pub fn page_url(url_prefix: &str, id: &str) -> String {
    format!("{url_prefix}{id}")
}

/// Process every identifier in order, one at a time.
///
/// Identifiers already in the completion log are skipped without a
/// fetch. A failing identifier is logged, left unrecorded, and the loop
/// moves on; a later run picks it up again. The stop flag is checked
/// only between identifiers, so whatever is in flight finishes first.
pub async fn scrape_all<F, E>(
    fetcher: &F,
    extractor: &E,
    archive: &mut Archive,
    url_prefix: &str,
    ids: &[String],
    stop: &AtomicBool,
) -> RunStats
where
    F: PageFetcher,
    E: FieldExtractor,
{
    let mut stats = RunStats::default();

    for id in ids {
        if stop.load(Ordering::SeqCst) {
            stats.interrupted = true;
            break;
        }

        if archive.is_complete(id) {
            info!("Skipping {} - already processed", id);
            stats.skipped += 1;
            continue;
        }

        match scrape_page(fetcher, extractor, archive, url_prefix, id).await {
            Ok(()) => {
                info!("Successfully scraped {}", id);
                stats.done += 1;
            }
            Err(e) => {
                warn!("Error scraping {} ({}): {}", id, e.kind(), e);
                stats.failed += 1;
            }
        }
    }

    stats
}

/// Fetch, extract, and persist a single identifier.
async fn scrape_page<F, E>(
    fetcher: &F,
    extractor: &E,
    archive: &mut Archive,
    url_prefix: &str,
    id: &str,
) -> Result<()>
where
    F: PageFetcher,
    E: FieldExtractor,
{
    let url = page_url(url_prefix, id);
    info!("Scraping {}", url);

    let html = fetcher.fetch(&url).await?;
    let fields = extractor.extract(&html)?;
    archive.save(&ScrapedRecord::new(id, &url, fields))?;
    Ok(())
}
