//! Cache command for inspecting the fingerprint cache.

use std::path::Path;

use adotrack::{FingerprintCache, FingerprintMap};
use anyhow::{Context, Result};

use crate::cli::CacheAction;

pub fn run(cache_file: &Path, action: CacheAction) -> Result<()> {
    let cache = FingerprintCache::new(cache_file);

    match action {
        CacheAction::Show => {
            let map = cache.load();
            for (external_id, fingerprint) in &map {
                println!("{:>12}  {}", external_id, fingerprint);
            }
            eprintln!("{} cached fingerprints in {}", map.len(), cache_file.display());
        }
        CacheAction::Clear => {
            let count = cache.load().len();
            cache
                .save(&FingerprintMap::new())
                .context("Failed to clear fingerprint cache")?;
            eprintln!("Removed {} cached fingerprints", count);
        }
    }

    Ok(())
}
