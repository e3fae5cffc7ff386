//! Fingerprint command for checking level metadata against the cache.

use adotrack::{FingerprintCache, LevelFileParser, ParsedMetadata, RuntimeConfig};
use anyhow::{Context, Result, bail};

/// Print metadata and fingerprint for an installed level
pub fn run_for_level(config: &RuntimeConfig, external_id: &str) -> Result<()> {
    let parser = LevelFileParser::new(&config.install_root);
    let metadata = parser
        .parse(external_id)
        .with_context(|| format!("Failed to read metadata of level {}", external_id))?;

    print_metadata(&metadata, config.strip_markup);

    let computed = metadata.fingerprint(config.strip_markup);
    let cache = FingerprintCache::new(&config.cache_file_path).load();
    match cache.get(external_id) {
        Some(cached) if *cached == computed => println!("Cache:       up to date"),
        Some(cached) => println!("Cache:       {} (differs, run `adotrack cache clear`)", cached),
        None => println!("Cache:       not cached"),
    }

    Ok(())
}

/// Print the fingerprint of fields given on the command line
pub fn run_for_fields(
    author: Option<String>,
    artist: Option<String>,
    song: Option<String>,
    strip_markup: bool,
) -> Result<()> {
    if author.is_none() && artist.is_none() && song.is_none() {
        bail!("Pass a workshop id or at least one of --author, --artist, --song");
    }

    let metadata = ParsedMetadata {
        author: author.unwrap_or_default(),
        artist: artist.unwrap_or_default(),
        song: song.unwrap_or_default(),
    };
    print_metadata(&metadata, strip_markup);
    Ok(())
}

fn print_metadata(metadata: &ParsedMetadata, strip_markup: bool) {
    println!("Author:      {}", metadata.author);
    println!("Artist:      {}", metadata.artist);
    println!("Song:        {}", metadata.song);
    println!("Markup:      {}", if strip_markup { "stripped" } else { "kept" });
    println!("Fingerprint: {}", metadata.fingerprint(strip_markup));
}
