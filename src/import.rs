use anyhow::Context;
use serde_json::Value;
use tracing::{info, warn};

use crate::{omdb::OmdbClient, store::MovieStore};

// Seeds the catalog from a newline-separated title list, one OMDb lookup
// per line. Misses and rejected records are logged and skipped so a single
// bad title cannot abort the run.
pub async fn run(store: &MovieStore, omdb: &OmdbClient, path: &str) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("read title list {path}"))?;

    let mut imported = 0usize;
    let mut total = 0usize;

    for title in raw.lines().map(str::trim).filter(|t| !t.is_empty()) {
        total += 1;

        let Some(input) = omdb.find_by_title(title).await? else {
            warn!(title = %title, "no omdb match, skipping");
            continue;
        };

        let mapped = serde_json::to_value(&input).context("serialize mapped movie fields")?;
        let Value::Object(fields) = mapped else {
            warn!(title = %title, "mapped fields are not an object, skipping");
            continue;
        };

        match store.create(fields).await {
            Ok(movie) => {
                info!(id = movie.id, title = %movie.title, "imported");
                imported += 1;
            },
            Err(err) => warn!(title = %title, error = %err, "store rejected record, skipping"),
        }
    }

    info!(imported, total, "import finished");
    Ok(())
}
