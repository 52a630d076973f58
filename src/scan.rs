//! Source and target tree scanners.
//!
//! The two scanners share one [`MatchTable`] and run in strict sequence:
//! the source scan fills in source-side records and resolves source/source
//! conflicts; the target scan then attaches target candidates and resolves
//! target/target conflicts against the settled source side. Both use the
//! same dummy-skip loop to roll past fingerprints that earlier conflicts
//! consumed as intermediate states.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::digest::{FileRecord, Fingerprint, RollingReader, DEFAULT_BLOCK_SIZE};
use crate::error::{PermutaError, Result};
use crate::table::{MatchEntry, MatchTable, TargetSlot};

/// Configuration for the matching engine.
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Bytes consumed per digest roll (power of 2, 512-65536).
    pub block_size: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

/// Builder for creating matchers with custom configuration.
///
/// # Example
///
/// ```rust
/// use permuta::MatcherBuilder;
///
/// let matcher = MatcherBuilder::new().block_size(2048).build();
/// assert_eq!(matcher.block_size(), 2048);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MatcherBuilder {
    config: MatcherConfig,
}

impl MatcherBuilder {
    /// Create a new builder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the block size consumed per digest roll.
    ///
    /// Must be a power of 2 between 512 and 65536.
    ///
    /// # Panics
    ///
    /// Panics if the block size is invalid.
    #[must_use]
    pub fn block_size(mut self, size: usize) -> Self {
        assert!(
            size.is_power_of_two() && (512..=65536).contains(&size),
            "Block size must be power of 2, 512-65536"
        );
        self.config.block_size = size;
        self
    }

    /// Build the matcher.
    #[must_use]
    pub fn build(self) -> Matcher {
        Matcher {
            config: self.config,
        }
    }
}

/// Content-matching engine driving both scan phases.
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatcherConfig,
}

impl Matcher {
    /// Create a matcher with default configuration.
    #[must_use]
    pub fn new() -> Self {
        MatcherBuilder::new().build()
    }

    /// Create a matcher with a custom block size.
    ///
    /// # Panics
    ///
    /// Panics if the block size is invalid.
    #[must_use]
    pub fn with_block_size(block_size: usize) -> Self {
        MatcherBuilder::new().block_size(block_size).build()
    }

    /// Get the configured block size.
    #[must_use]
    pub const fn block_size(&self) -> usize {
        self.config.block_size
    }

    /// Walk SOURCE and fill the table with source-side records.
    ///
    /// # Errors
    ///
    /// Returns an error only when `root` itself is inaccessible; read
    /// errors on individual files degrade those files and are logged.
    pub fn scan_source(&self, root: &Path, table: &mut MatchTable) -> Result<()> {
        let visited = visit_tree(root, |rel, size| {
            self.visit_source_file(root, rel, size, table);
        })?;
        info!("scanned {} files under '{}'", visited, root.display());
        Ok(())
    }

    /// Walk TARGET and attach candidates to the settled source side.
    ///
    /// The source scan must be complete before this runs; target files are
    /// matched against the table as-is and never create source entries.
    ///
    /// # Errors
    ///
    /// Returns an error only when `root` itself is inaccessible.
    pub fn scan_target(
        &self,
        root: &Path,
        source_root: &Path,
        table: &mut MatchTable,
    ) -> Result<()> {
        let visited = visit_tree(root, |rel, size| {
            self.visit_target_file(root, source_root, rel, size, table);
        })?;
        info!("scanned {} files under '{}'", visited, root.display());
        Ok(())
    }

    fn visit_source_file(&self, root: &Path, rel: PathBuf, size: u64, table: &mut MatchTable) {
        let mut record = FileRecord::new(rel, size);
        let mut key = Fingerprint::of_size(size);
        let mut reader = RollingReader::new(root.join(&record.path), self.config.block_size);

        let Some(exhausted) = skip_dummies(table, &mut record, &mut key, &mut reader) else {
            return;
        };

        match table.get(&key) {
            Some(entry) if entry.is_dummy() => {
                // Exhausted while still on a dummy chain: same content as an
                // already-dropped duplicate pair.
                debug_assert!(exhausted);
                warn!("Source duplicate ({}) '{}'", key.hex(), record.path.display());
            }
            None => {
                table.insert(key, MatchEntry::with_source(record));
            }
            Some(_) => {
                if let Some(rival) = table.take_source(&key) {
                    self.resolve_source_conflict(root, table, record, key, reader, rival);
                }
            }
        }
    }

    /// Lock-step two same-size source files until their fingerprints
    /// diverge or both exhaust still equal.
    fn resolve_source_conflict(
        &self,
        root: &Path,
        table: &mut MatchTable,
        mut record: FileRecord,
        mut key: Fingerprint,
        mut reader: RollingReader,
        mut rival: FileRecord,
    ) {
        let mut rival_key = key;
        let mut rival_reader = RollingReader::new(root.join(&rival.path), self.config.block_size);

        loop {
            // Remember the shared fingerprint as an intermediate state so
            // later files of the same size roll past it.
            table.mark_dummy(key);

            let rolled = match reader.roll(&mut record, &mut key) {
                Ok(rolled) => rolled,
                Err(err) => {
                    warn!("read error on '{}': {}", record.path.display(), err);
                    table.insert(rival_key, MatchEntry::with_source(rival));
                    return;
                }
            };
            if let Err(err) = rival_reader.roll(&mut rival, &mut rival_key) {
                warn!("read error on '{}': {}", rival.path.display(), err);
                table.insert(key, MatchEntry::with_source(record));
                return;
            }

            if key != rival_key {
                // Contents diverged: both survive under their own fingerprints.
                table.insert(key, MatchEntry::with_source(record));
                table.insert(rival_key, MatchEntry::with_source(rival));
                return;
            }
            if rolled.is_exhausted() {
                // Identical to the last byte: true duplicates. Keep only the
                // marker so neither side gets renamed onto the other.
                table.mark_dummy(key);
                warn!("Source duplicate ({}) '{}'", key.hex(), record.path.display());
                warn!("Source duplicate ({}) '{}'", rival_key.hex(), rival.path.display());
                return;
            }
        }
    }

    fn visit_target_file(
        &self,
        root: &Path,
        source_root: &Path,
        rel: PathBuf,
        size: u64,
        table: &mut MatchTable,
    ) {
        let mut record = FileRecord::new(rel, size);
        let mut key = Fingerprint::of_size(size);
        let mut reader = RollingReader::new(root.join(&record.path), self.config.block_size);

        if skip_dummies(table, &mut record, &mut key, &mut reader).is_none() {
            return;
        }

        match table.get(&key) {
            Some(entry) if entry.is_dummy() => {
                // The content matches a pair that was already dropped as
                // duplicate on one side or the other.
                warn!(
                    "Target duplicate match ({}) '{}'",
                    key.hex(),
                    record.path.display()
                );
            }
            None => {
                debug!("no source match for '{}'", record.path.display());
            }
            Some(entry) if entry.target.is_unsolvable() => {
                if let Some(source) = &entry.source {
                    warn!(
                        "Target duplicate ({}) '{}', source match '{}'",
                        key.hex(),
                        record.path.display(),
                        source.path.display()
                    );
                }
            }
            Some(entry) if entry.target.is_unset() => {
                if let Some(entry) = table.get_mut(&key) {
                    entry.target = TargetSlot::Matched(record);
                }
            }
            Some(_) => {
                self.resolve_target_conflict(root, source_root, table, record, key, reader);
            }
        }
    }

    /// Lock-step the shared source, the incumbent target candidate, and the
    /// incoming candidate until the source disambiguates them.
    fn resolve_target_conflict(
        &self,
        root: &Path,
        source_root: &Path,
        table: &mut MatchTable,
        mut record: FileRecord,
        mut key: Fingerprint,
        mut reader: RollingReader,
    ) {
        let Some((mut source, mut rival)) = table.take_pair(&key) else {
            return;
        };
        let mut source_key = key;
        let mut rival_key = key;
        let mut source_reader =
            RollingReader::new(source_root.join(&source.path), self.config.block_size);
        let mut rival_reader = RollingReader::new(root.join(&rival.path), self.config.block_size);
        let mut record_failed = false;
        let mut rival_failed = false;

        loop {
            table.mark_dummy(source_key);

            let rolled = match source_reader.roll(&mut source, &mut source_key) {
                Ok(rolled) => rolled,
                Err(err) => {
                    // Without a readable source nothing at this fingerprint
                    // can be decided; drop the whole entry.
                    warn!("read error on source '{}': {}", source.path.display(), err);
                    return;
                }
            };
            if let Err(err) = reader.roll(&mut record, &mut key) {
                warn!("read error on '{}': {}", record.path.display(), err);
                record_failed = true;
            }
            if let Err(err) = rival_reader.roll(&mut rival, &mut rival_key) {
                warn!("read error on '{}': {}", rival.path.display(), err);
                rival_failed = true;
            }

            if record_failed || rival_failed {
                break;
            }
            if key != source_key || rival_key != source_key {
                break;
            }
            if rolled.is_exhausted() {
                // All three identical to the last byte: the source cannot
                // tell its candidates apart, now or ever.
                warn!(
                    "Target duplicate ({}) '{}', source match '{}'",
                    key.hex(),
                    record.path.display(),
                    source.path.display()
                );
                warn!(
                    "Target duplicate ({}) '{}', source match '{}'",
                    rival_key.hex(),
                    rival.path.display(),
                    source.path.display()
                );
                table.insert(
                    source_key,
                    MatchEntry {
                        source: Some(source),
                        target: TargetSlot::Unsolvable,
                    },
                );
                return;
            }
        }

        // Divergence or candidate failure: whichever candidate still tracks
        // the source keeps the slot; with neither left, the entry reverts to
        // awaiting a match.
        let record_matches = !record_failed && key == source_key;
        let rival_matches = !rival_failed && rival_key == source_key;
        let target = if record_matches {
            TargetSlot::Matched(record)
        } else if rival_matches {
            TargetSlot::Matched(rival)
        } else {
            TargetSlot::Unset
        };
        table.insert(
            source_key,
            MatchEntry {
                source: Some(source),
                target,
            },
        );
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Roll past dummy entries left behind by earlier conflicts.
///
/// Returns `Some(exhausted)` when a non-dummy state was reached or the
/// file's own fingerprint became final, `None` when a read error dropped
/// the file.
fn skip_dummies(
    table: &MatchTable,
    record: &mut FileRecord,
    key: &mut Fingerprint,
    reader: &mut RollingReader,
) -> Option<bool> {
    let mut exhausted = false;
    while !exhausted && table.get(key).is_some_and(MatchEntry::is_dummy) {
        match reader.roll(record, key) {
            Ok(rolled) => exhausted = rolled.is_exhausted(),
            Err(err) => {
                warn!("read error on '{}': {}", record.path.display(), err);
                return None;
            }
        }
    }
    Some(exhausted)
}

/// Walk a tree root, handing every regular non-empty file to `visit` as a
/// `(relative path, size)` pair, in a deterministic order.
///
/// Empty files are excluded outright: they would only add noise to the
/// duplicate detection. Symbolic links are not followed.
fn visit_tree<F>(root: &Path, mut visit: F) -> Result<usize>
where
    F: FnMut(PathBuf, u64),
{
    let meta = fs::metadata(root).map_err(|err| PermutaError::RootAccess {
        path: root.to_path_buf(),
        source: err,
    })?;
    if !meta.is_dir() {
        return Err(PermutaError::RootAccess {
            path: root.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        });
    }

    let mut visited = 0;
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("walk error under '{}': {}", root.display(), err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let meta = match entry.metadata() {
            Ok(meta) => meta,
            Err(err) => {
                warn!("cannot stat '{}': {}", entry.path().display(), err);
                continue;
            }
        };
        if meta.len() == 0 {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        visit(rel.to_path_buf(), meta.len());
        visited += 1;
    }
    Ok(visited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BLOCK: usize = 512;

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let abs = root.join(rel);
        if let Some(parent) = abs.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(abs, content).unwrap();
    }

    fn scan(source: &TempDir, target: Option<&TempDir>) -> MatchTable {
        let matcher = Matcher::with_block_size(BLOCK);
        let mut table = MatchTable::new();
        matcher.scan_source(source.path(), &mut table).unwrap();
        if let Some(target) = target {
            matcher
                .scan_target(target.path(), source.path(), &mut table)
                .unwrap();
        }
        table
    }

    fn source_paths(table: &MatchTable) -> Vec<String> {
        let mut paths: Vec<String> = table
            .iter()
            .filter_map(|(_, e)| e.source.as_ref())
            .map(|r| r.path.display().to_string())
            .collect();
        paths.sort();
        paths
    }

    fn target_of<'a>(table: &'a MatchTable, source_path: &str) -> Option<&'a TargetSlot> {
        table
            .iter()
            .find(|(_, e)| {
                e.source
                    .as_ref()
                    .is_some_and(|s| s.path == Path::new(source_path))
            })
            .map(|(_, e)| &e.target)
    }

    // ==========================================================================
    // BUILDER TESTS
    // ==========================================================================

    #[test]
    fn builder_default() {
        let matcher = MatcherBuilder::new().build();
        assert_eq!(matcher.block_size(), DEFAULT_BLOCK_SIZE);
    }

    #[test]
    fn builder_block_size() {
        let matcher = MatcherBuilder::new().block_size(1024).build();
        assert_eq!(matcher.block_size(), 1024);
    }

    #[test]
    #[should_panic(expected = "Block size must be power of 2")]
    fn builder_rejects_non_power_of_two() {
        let _ = MatcherBuilder::new().block_size(1000);
    }

    #[test]
    #[should_panic(expected = "Block size must be power of 2")]
    fn builder_rejects_tiny_blocks() {
        let _ = MatcherBuilder::new().block_size(256);
    }

    // ==========================================================================
    // SOURCE SCAN TESTS
    // ==========================================================================

    #[test]
    fn distinct_sizes_get_size_only_entries() {
        let src = TempDir::new().unwrap();
        write(src.path(), "a", b"x");
        write(src.path(), "b", b"xy");
        write(src.path(), "sub/c", b"xyz");

        let table = scan(&src, None);

        assert_eq!(table.len(), 3);
        for (key, entry) in table.iter() {
            assert_eq!(key.rolls, 0);
            assert!(entry.source.is_some());
        }
    }

    #[test]
    fn empty_files_are_ignored() {
        let src = TempDir::new().unwrap();
        write(src.path(), "empty", b"");
        write(src.path(), "full", b"content");

        let table = scan(&src, None);

        assert_eq!(source_paths(&table), vec!["full".to_string()]);
    }

    #[test]
    fn source_duplicates_collapse_to_dummy() {
        let src = TempDir::new().unwrap();
        write(src.path(), "a1", b"identical content here");
        write(src.path(), "a2", b"identical content here");

        let table = scan(&src, None);

        // Only dummies survive: the size-only key and the exhausted key.
        assert!(source_paths(&table).is_empty());
        assert_eq!(table.len(), 2);
        assert!(table.iter().all(|(_, e)| e.is_dummy()));
    }

    #[test]
    fn three_way_source_duplicates_all_drop() {
        let src = TempDir::new().unwrap();
        write(src.path(), "a1", b"same same");
        write(src.path(), "a2", b"same same");
        write(src.path(), "sub/a3", b"same same");

        let table = scan(&src, None);

        assert!(source_paths(&table).is_empty());
    }

    #[test]
    fn same_size_distinct_files_both_survive() {
        let src = TempDir::new().unwrap();
        write(src.path(), "a", b"first version");
        write(src.path(), "b", b"other version");

        let table = scan(&src, None);

        assert_eq!(source_paths(&table), vec!["a".to_string(), "b".to_string()]);
        // Both re-landed on rolled fingerprints past the shared dummy.
        for (key, entry) in table.iter() {
            if entry.source.is_some() {
                assert_eq!(key.rolls, 1);
            }
        }
    }

    #[test]
    fn late_divergence_resolves_at_second_roll() {
        let src = TempDir::new().unwrap();
        let mut one = vec![9u8; BLOCK + 40];
        let mut two = one.clone();
        one[BLOCK + 10] = 1;
        two[BLOCK + 10] = 2;
        write(src.path(), "one", &one);
        write(src.path(), "two", &two);

        let table = scan(&src, None);

        assert_eq!(
            source_paths(&table),
            vec!["one".to_string(), "two".to_string()]
        );
        for (key, entry) in table.iter() {
            if entry.source.is_some() {
                assert_eq!(key.rolls, 2);
            }
        }
    }

    #[test]
    fn later_file_rolls_past_dummy_chain() {
        let src = TempDir::new().unwrap();
        write(src.path(), "a1", b"duplicate pair aaaa");
        write(src.path(), "a2", b"duplicate pair aaaa");
        // Same size, different content; arrives after the pair dropped.
        write(src.path(), "b99", b"unrelated bytes 999");

        let table = scan(&src, None);

        assert_eq!(source_paths(&table), vec!["b99".to_string()]);
        let (key, _) = table
            .iter()
            .find(|(_, e)| e.source.is_some())
            .expect("survivor entry");
        assert_eq!(key.rolls, 1);
    }

    // ==========================================================================
    // TARGET SCAN TESTS
    // ==========================================================================

    #[test]
    fn target_with_no_source_counterpart_is_dropped() {
        let src = TempDir::new().unwrap();
        let tgt = TempDir::new().unwrap();
        write(src.path(), "a", b"source content");
        write(tgt.path(), "b", b"something else entirely");

        let table = scan(&src, Some(&tgt));

        assert!(target_of(&table, "a").unwrap().is_unset());
    }

    #[test]
    fn matching_target_attaches() {
        let src = TempDir::new().unwrap();
        let tgt = TempDir::new().unwrap();
        write(src.path(), "new/place", b"movable content");
        write(tgt.path(), "old/spot", b"movable content");

        let table = scan(&src, Some(&tgt));

        let slot = target_of(&table, "new/place").unwrap();
        assert_eq!(
            slot.as_matched().map(|r| r.path.clone()),
            Some(PathBuf::from("old/spot"))
        );
    }

    #[test]
    fn size_collision_attaches_by_size_alone() {
        // Known approximate behavior: a lone size match is trusted without
        // reading either file.
        let src = TempDir::new().unwrap();
        let tgt = TempDir::new().unwrap();
        write(src.path(), "s", b"AAAA");
        write(tgt.path(), "t", b"BBBB");

        let table = scan(&src, Some(&tgt));

        let slot = target_of(&table, "s").unwrap();
        assert_eq!(
            slot.as_matched().map(|r| r.path.clone()),
            Some(PathBuf::from("t"))
        );
    }

    #[test]
    fn target_matching_dropped_source_pair_is_flagged() {
        let src = TempDir::new().unwrap();
        let tgt = TempDir::new().unwrap();
        write(src.path(), "a1", b"twice in source");
        write(src.path(), "a2", b"twice in source");
        write(tgt.path(), "t", b"twice in source");

        let table = scan(&src, Some(&tgt));

        // The target file lands on the dummy chain and is discarded.
        assert!(table.iter().all(|(_, e)| e.is_dummy()));
    }

    #[test]
    fn three_way_duplicate_marks_unsolvable() {
        let src = TempDir::new().unwrap();
        let tgt = TempDir::new().unwrap();
        write(src.path(), "s", b"everyone has this");
        write(tgt.path(), "t1", b"everyone has this");
        write(tgt.path(), "t2", b"everyone has this");

        let table = scan(&src, Some(&tgt));

        assert!(target_of(&table, "s").unwrap().is_unsolvable());
    }

    #[test]
    fn unsolvable_entry_rejects_later_candidates() {
        let src = TempDir::new().unwrap();
        let tgt = TempDir::new().unwrap();
        write(src.path(), "s", b"everyone has this");
        write(tgt.path(), "t1", b"everyone has this");
        write(tgt.path(), "t2", b"everyone has this");
        write(tgt.path(), "t3", b"everyone has this");

        let table = scan(&src, Some(&tgt));

        assert!(target_of(&table, "s").unwrap().is_unsolvable());
    }

    #[test]
    fn incumbent_candidate_wins_when_challenger_diverges() {
        let src = TempDir::new().unwrap();
        let tgt = TempDir::new().unwrap();
        let mut matching = vec![5u8; BLOCK + 60];
        let mut divergent = matching.clone();
        divergent[BLOCK + 20] = 6;
        matching[BLOCK + 20] = 5;
        write(src.path(), "s", &matching);
        write(tgt.path(), "t1", &matching);
        write(tgt.path(), "t2", &divergent);

        let table = scan(&src, Some(&tgt));

        let slot = target_of(&table, "s").unwrap();
        assert_eq!(
            slot.as_matched().map(|r| r.path.clone()),
            Some(PathBuf::from("t1"))
        );
    }

    #[test]
    fn challenger_wins_when_incumbent_diverges() {
        let src = TempDir::new().unwrap();
        let tgt = TempDir::new().unwrap();
        let mut matching = vec![5u8; BLOCK + 60];
        let mut divergent = matching.clone();
        divergent[BLOCK + 20] = 6;
        matching[BLOCK + 20] = 5;
        write(src.path(), "s", &matching);
        // Sorted order: t1 (divergent) attaches first, t2 (matching) challenges.
        write(tgt.path(), "t1", &divergent);
        write(tgt.path(), "t2", &matching);

        let table = scan(&src, Some(&tgt));

        let slot = target_of(&table, "s").unwrap();
        assert_eq!(
            slot.as_matched().map(|r| r.path.clone()),
            Some(PathBuf::from("t2"))
        );
    }

    #[test]
    fn entry_reverts_when_both_candidates_diverge() {
        let src = TempDir::new().unwrap();
        let tgt = TempDir::new().unwrap();
        let mut original = vec![5u8; BLOCK + 60];
        let mut off_one = original.clone();
        let mut off_two = original.clone();
        original[BLOCK + 20] = 0;
        off_one[BLOCK + 20] = 1;
        off_two[BLOCK + 20] = 2;
        write(src.path(), "s", &original);
        write(tgt.path(), "t1", &off_one);
        write(tgt.path(), "t2", &off_two);

        let table = scan(&src, Some(&tgt));

        assert!(target_of(&table, "s").unwrap().is_unset());
    }

    #[test]
    fn late_matching_candidate_lands_after_revert() {
        let src = TempDir::new().unwrap();
        let tgt = TempDir::new().unwrap();
        let mut original = vec![5u8; BLOCK + 60];
        let mut off_one = original.clone();
        let mut off_two = original.clone();
        original[BLOCK + 20] = 0;
        off_one[BLOCK + 20] = 1;
        off_two[BLOCK + 20] = 2;
        write(src.path(), "s", &original);
        write(tgt.path(), "t1", &off_one);
        write(tgt.path(), "t2", &off_two);
        // Arrives last, rolls the dummy chain down to the reverted entry.
        write(tgt.path(), "t3", &original);

        let table = scan(&src, Some(&tgt));

        let slot = target_of(&table, "s").unwrap();
        assert_eq!(
            slot.as_matched().map(|r| r.path.clone()),
            Some(PathBuf::from("t3"))
        );
    }

    #[test]
    fn target_duplicates_of_distinct_source_are_unsolvable_not_dropped() {
        // The source survives with its entry poisoned for targets only.
        let src = TempDir::new().unwrap();
        let tgt = TempDir::new().unwrap();
        write(src.path(), "keep/me", b"wanted data");
        write(tgt.path(), "x", b"wanted data");
        write(tgt.path(), "y", b"wanted data");

        let table = scan(&src, Some(&tgt));

        let entry = table
            .iter()
            .find(|(_, e)| e.source.is_some())
            .map(|(_, e)| e)
            .expect("source entry");
        assert_eq!(entry.source.as_ref().unwrap().path, Path::new("keep/me"));
        assert!(entry.target.is_unsolvable());
    }

    // ==========================================================================
    // SETUP ERRORS
    // ==========================================================================

    #[test]
    fn missing_root_is_fatal() {
        let matcher = Matcher::with_block_size(BLOCK);
        let mut table = MatchTable::new();
        let err = matcher
            .scan_source(Path::new("/no/such/root"), &mut table)
            .unwrap_err();
        assert!(matches!(err, PermutaError::RootAccess { .. }));
    }

    #[test]
    fn file_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "plain", b"data");
        let matcher = Matcher::with_block_size(BLOCK);
        let mut table = MatchTable::new();
        let err = matcher
            .scan_source(&dir.path().join("plain"), &mut table)
            .unwrap_err();
        assert!(matches!(err, PermutaError::RootAccess { .. }));
    }
}
