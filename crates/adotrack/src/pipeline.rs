//! State reconciliation over the level catalog.
//!
//! One run loads the save file and the fingerprint cache, resolves a
//! fingerprint for every level (cache first, level file otherwise), classifies
//! its progress and finally persists any newly computed fingerprints.
//!
//! Runs are synchronous and own the cache file for their duration. Two
//! overlapping runs would each overwrite the whole cache, so callers running
//! the pipeline from several threads must serialize the runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::RuntimeConfig;
use crate::error::Result;
use crate::fingerprint::{FingerprintCache, FingerprintMap};
use crate::level::{Level, LevelFileParser, MetadataSource};
use crate::progress::{LevelProgress, ProgressKind, SaveData, resolve, skill_rating};

/// Progress of every level resolved in a run, keyed by level id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressSnapshot {
    levels: BTreeMap<u32, LevelProgress>,
}

impl ProgressSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, level_id: u32) -> Option<&LevelProgress> {
        self.levels.get(&level_id)
    }

    pub fn insert(&mut self, level_id: u32, progress: LevelProgress) {
        self.levels.insert(level_id, progress);
    }

    /// Kind of a level; levels without an entry count as not played
    pub fn kind_of(&self, level_id: u32) -> ProgressKind {
        self.get(level_id)
            .map(LevelProgress::kind)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&u32, &LevelProgress)> {
        self.levels.iter()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Apply a newer run on top of this snapshot.
    ///
    /// Levels the run skipped keep their previous entry, and an aborted (empty)
    /// run changes nothing.
    pub fn merge(&mut self, run: ProgressSnapshot) {
        self.levels.extend(run.levels);
    }

    /// Skill rating over the `top_n` best contributions
    pub fn skill_rating(&self, top_n: usize) -> f64 {
        skill_rating(self.levels.values().map(|p| p.contribution), top_n)
    }
}

/// Resolves the progress of workshop levels against the save file
pub struct ReconciliationPipeline<S = LevelFileParser> {
    config: RuntimeConfig,
    cache: FingerprintCache,
    source: S,
}

impl ReconciliationPipeline<LevelFileParser> {
    /// Create a pipeline reading level files below the configured install root
    pub fn new(config: RuntimeConfig) -> Self {
        let source = LevelFileParser::new(&config.install_root);
        Self::with_source(config, source)
    }
}

impl<S: MetadataSource> ReconciliationPipeline<S> {
    /// Create a pipeline with a custom metadata source
    pub fn with_source(config: RuntimeConfig, source: S) -> Self {
        let cache = FingerprintCache::new(&config.cache_file_path);
        Self {
            config,
            cache,
            source,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn cache(&self) -> &FingerprintCache {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve the progress of every level.
    ///
    /// Levels whose metadata cannot be read get no entry. If the save file
    /// cannot be loaded the run aborts with an empty snapshot, which means
    /// "no new information" rather than "nothing played".
    pub fn run(&self, levels: &[Level]) -> ProgressSnapshot {
        match self.try_run(levels) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Failed to load save data: {}", e);
                ProgressSnapshot::new()
            }
        }
    }

    /// Like `run`, but reports an unreadable save file as
    /// `Error::SaveDataUnavailable` instead of an empty snapshot.
    pub fn try_run(&self, levels: &[Level]) -> Result<ProgressSnapshot> {
        let save = SaveData::load(&self.config.save_file_path)?;

        let mut cache = self.cache.load();
        let mut staged = FingerprintMap::new();
        let mut snapshot = ProgressSnapshot::new();

        for level in levels {
            let external_id = level.external_id();

            let fingerprint = match cache.get(external_id).or_else(|| staged.get(external_id)) {
                Some(fingerprint) => {
                    debug!("Cache hit for level {} ({})", level.id, external_id);
                    fingerprint.clone()
                }
                None => match self.source.read_metadata(external_id) {
                    Ok(metadata) => {
                        let fingerprint = metadata.fingerprint(self.config.strip_markup);
                        staged.insert(external_id.to_string(), fingerprint.clone());
                        fingerprint
                    }
                    Err(e) => {
                        debug!("Skipping level {}: {}", level.id, e);
                        continue;
                    }
                },
            };

            snapshot.insert(level.id, resolve(&fingerprint, &save, level.difficulty));
        }

        if !staged.is_empty() {
            info!("Caching {} new fingerprints", staged.len());
            cache.extend(staged);
            if let Err(e) = self.cache.save(&cache) {
                warn!("Failed to save fingerprint cache: {}", e);
            }
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fs;
    use std::path::Path;

    use tempfile::TempDir;

    use crate::error::Error;
    use crate::fingerprint::{Fingerprint, fingerprint};
    use crate::level::{LEVEL_FILE_NAME, Music, ParsedMetadata};
    use crate::progress::ProgressState;

    /// Level file parser that counts how often it is asked
    struct CountingParser {
        inner: LevelFileParser,
        calls: Cell<usize>,
    }

    impl CountingParser {
        fn new(root: &Path) -> Self {
            Self {
                inner: LevelFileParser::new(root),
                calls: Cell::new(0),
            }
        }
    }

    impl MetadataSource for CountingParser {
        fn read_metadata(&self, external_id: &str) -> Result<ParsedMetadata> {
            self.calls.set(self.calls.get() + 1);
            self.inner.read_metadata(external_id)
        }
    }

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
            }
        }

        fn root(&self) -> &Path {
            self.dir.path()
        }

        fn workshop(&self) -> std::path::PathBuf {
            self.root().join("workshop")
        }

        fn cache_path(&self) -> std::path::PathBuf {
            self.root().join("resource").join("workshop_md5_map.json")
        }

        fn save_path(&self) -> std::path::PathBuf {
            self.root().join("custom_data.sav")
        }

        fn write_level(&self, external_id: &str, author: &str, artist: &str, song: &str) {
            let dir = self.workshop().join(external_id);
            fs::create_dir_all(&dir).unwrap();
            let text = format!(
                "{{\r\t\"settings\":\r\t{{\r\t\t\"song\": \"{song}\", \r\t\t\"artist\": \"{artist}\", \r\t\t\"author\": \"{author}\", \r\t}}\r}}"
            );
            fs::write(dir.join(LEVEL_FILE_NAME), text).unwrap();
        }

        fn write_save(&self, json: &str) {
            fs::write(self.save_path(), json).unwrap();
        }

        fn write_cache(&self, entries: &[(&str, &str)]) {
            let map: FingerprintMap = entries
                .iter()
                .map(|(id, fp)| (id.to_string(), Fingerprint::from_hex(*fp)))
                .collect();
            FingerprintCache::new(self.cache_path()).save(&map).unwrap();
        }

        fn read_cache(&self) -> FingerprintMap {
            FingerprintCache::new(self.cache_path()).load()
        }

        fn pipeline(&self) -> ReconciliationPipeline<CountingParser> {
            let config = RuntimeConfig::builder()
                .install_root(self.workshop())
                .save_file_path(self.save_path())
                .cache_file_path(self.cache_path())
                .build()
                .unwrap();
            ReconciliationPipeline::with_source(config, CountingParser::new(&self.workshop()))
        }
    }

    fn level(id: u32, external_id: &str, difficulty: f64) -> Level {
        Level {
            id,
            workshop_url: format!(
                "https://steamcommunity.com/sharedfiles/filedetails/?id={external_id}&searchtext="
            ),
            music: Music::default(),
            difficulty,
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        let fixture = Fixture::new();
        fixture.write_cache(&[("1001", "abc123")]);
        fixture.write_level("1002", "X", "Y", "Z");
        fixture.write_save(
            r#"{"CustomWorld_abc123_Completion": 1.0, "CustomWorld_abc123_XAccuracy": 1.0}"#,
        );

        let pipeline = fixture.pipeline();
        let snapshot = pipeline.run(&[level(1, "1001", 10.0), level(2, "1002", 5.0)]);

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get(1).unwrap().state, ProgressState::Flawless);
        assert_eq!(snapshot.get(1).unwrap().contribution, 10.0);
        assert_eq!(snapshot.get(2).unwrap().state, ProgressState::NotPlayed);
        assert_eq!(pipeline.source().calls.get(), 1);

        let cache = fixture.read_cache();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache["1001"].as_str(), "abc123");
        assert_eq!(
            cache["1002"],
            fingerprint(Some("X"), Some("Y"), Some("Z"), true)
        );
    }

    #[test]
    fn test_cache_hit_avoids_parse() {
        let fixture = Fixture::new();
        fixture.write_cache(&[("1001", "abc123")]);
        fixture.write_save(r#"{"CustomWorld_abc123_Completion": 0.5}"#);

        let pipeline = fixture.pipeline();
        let snapshot = pipeline.run(&[level(1, "1001", 10.0)]);

        assert_eq!(pipeline.source().calls.get(), 0);
        assert_eq!(snapshot.get(1).unwrap().state, ProgressState::InProgress(0.5));
    }

    #[test]
    fn test_new_fingerprint_is_reused_on_next_run() {
        let fixture = Fixture::new();
        fixture.write_level("1002", "X", "Y", "Z");
        fixture.write_save("{}");

        let first = fixture.pipeline();
        first.run(&[level(2, "1002", 5.0)]);
        assert_eq!(first.source().calls.get(), 1);

        let second = fixture.pipeline();
        let snapshot = second.run(&[level(2, "1002", 5.0)]);
        assert_eq!(second.source().calls.get(), 0);
        assert_eq!(snapshot.kind_of(2), ProgressKind::NotPlayed);
    }

    #[test]
    fn test_duplicate_external_id_parsed_once() {
        let fixture = Fixture::new();
        fixture.write_level("1002", "X", "Y", "Z");
        fixture.write_save("{}");

        let pipeline = fixture.pipeline();
        let snapshot = pipeline.run(&[level(2, "1002", 5.0), level(3, "1002", 6.0)]);

        assert_eq!(pipeline.source().calls.get(), 1);
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_missing_level_file_is_skipped() {
        let fixture = Fixture::new();
        fixture.write_level("1002", "X", "Y", "Z");
        fixture.write_save("{}");

        let pipeline = fixture.pipeline();
        let snapshot = pipeline.run(&[level(1, "404", 10.0), level(2, "1002", 5.0)]);

        assert!(snapshot.get(1).is_none());
        assert!(snapshot.get(2).is_some());

        let cache = fixture.read_cache();
        assert!(!cache.contains_key("404"));
        assert!(cache.contains_key("1002"));
    }

    #[test]
    fn test_malformed_level_file_is_skipped() {
        let fixture = Fixture::new();
        let dir = fixture.workshop().join("500");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(LEVEL_FILE_NAME), "{\"author\": \"only\"}").unwrap();
        fixture.write_save("{}");

        let snapshot = fixture.pipeline().run(&[level(1, "500", 10.0)]);

        assert!(snapshot.is_empty());
        assert!(fixture.read_cache().is_empty());
    }

    #[test]
    fn test_missing_save_data_aborts() {
        let fixture = Fixture::new();
        fixture.write_cache(&[("1001", "abc123")]);
        fixture.write_level("1002", "X", "Y", "Z");

        let pipeline = fixture.pipeline();
        let snapshot = pipeline.run(&[level(1, "1001", 10.0), level(2, "1002", 5.0)]);

        assert!(snapshot.is_empty());
        assert_eq!(pipeline.source().calls.get(), 0);
        assert_eq!(fixture.read_cache().len(), 1);
    }

    #[test]
    fn test_try_run_reports_missing_save_data() {
        let fixture = Fixture::new();
        fixture.write_cache(&[("1001", "abc123")]);

        let pipeline = fixture.pipeline();
        let err = pipeline.try_run(&[level(1, "1001", 10.0)]).unwrap_err();

        assert!(matches!(err, Error::SaveDataUnavailable { .. }));
        assert_eq!(pipeline.source().calls.get(), 0);
    }

    #[test]
    fn test_try_run_matches_run_on_success() {
        let fixture = Fixture::new();
        fixture.write_cache(&[("1001", "abc123")]);
        fixture.write_save(r#"{"CustomWorld_abc123_Completion": 0.5}"#);

        let pipeline = fixture.pipeline();
        let levels = [level(1, "1001", 10.0)];
        assert_eq!(pipeline.try_run(&levels).unwrap(), pipeline.run(&levels));
    }

    #[test]
    fn test_corrupt_save_data_aborts() {
        let fixture = Fixture::new();
        fixture.write_level("1002", "X", "Y", "Z");
        fixture.write_save("{ broken");

        let snapshot = fixture.pipeline().run(&[level(2, "1002", 5.0)]);
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_unchanged_cache_is_not_rewritten() {
        let fixture = Fixture::new();
        fixture.write_cache(&[("1001", "abc123")]);
        fixture.write_save("{}");
        fs::write(fixture.cache_path(), "{\"1001\":\"abc123\"}").unwrap();

        fixture.pipeline().run(&[level(1, "1001", 10.0)]);

        assert_eq!(
            fs::read_to_string(fixture.cache_path()).unwrap(),
            "{\"1001\":\"abc123\"}"
        );
    }

    #[test]
    fn test_snapshot_merge_retains_skipped_levels() {
        let mut previous = ProgressSnapshot::new();
        previous.insert(1, LevelProgress::not_played());
        previous.insert(
            2,
            LevelProgress {
                state: ProgressState::Flawless,
                contribution: 10.0,
            },
        );

        let mut run = ProgressSnapshot::new();
        run.insert(
            1,
            LevelProgress {
                state: ProgressState::InProgress(0.3),
                contribution: 0.0,
            },
        );

        previous.merge(run);
        assert_eq!(previous.kind_of(1), ProgressKind::InProgress);
        assert_eq!(previous.kind_of(2), ProgressKind::Flawless);
        assert_eq!(previous.kind_of(3), ProgressKind::NotPlayed);

        previous.merge(ProgressSnapshot::new());
        assert_eq!(previous.len(), 2);
    }

    #[test]
    fn test_snapshot_skill_rating() {
        let mut snapshot = ProgressSnapshot::new();
        snapshot.insert(
            1,
            LevelProgress {
                state: ProgressState::Flawless,
                contribution: 10.0,
            },
        );
        snapshot.insert(2, LevelProgress::not_played());
        assert_eq!(snapshot.skill_rating(2), 5.0);
    }
}
