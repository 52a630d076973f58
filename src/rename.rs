//! The rename relation and its executor.
//!
//! Scanning produces an `oldpath -> newpath` relation over paths relative to
//! the target root. Executing it is destructive, so order matters: a chain
//! `a->b, b->c` must rename `b` before `a`, and a cycle `a->b, b->c, c->a`
//! has no safe end at all until one link is detached onto a temporary name.
//! The executor walks every chain forward to its end, then renames backward,
//! so that at most one pending rename targets any destination at a time.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::error::{PermutaError, Result};
use crate::table::{MatchTable, TargetSlot};

/// Planned renames: `oldpath -> newpath`, both relative to the target root.
///
/// The inverse mapping is maintained alongside so chains can be walked
/// backward. In-place pairs (`oldpath == newpath`) are never stored.
///
/// Serializes as a flat JSON object with sorted keys — the preview document
/// a user can inspect, edit, and replay.
#[derive(Debug, Clone, Default)]
pub struct RenamePlan {
    forward: FxHashMap<PathBuf, PathBuf>,
    reverse: FxHashMap<PathBuf, PathBuf>,
}

impl RenamePlan {
    /// Create an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the plan from a fully scanned table.
    ///
    /// Every entry holding both a source record and a concrete target
    /// candidate contributes one pair; entries whose target already sits at
    /// the source's relative path are dropped as no-ops.
    #[must_use]
    pub fn from_table(table: &MatchTable) -> Self {
        let mut plan = Self::new();
        for (_, entry) in table.iter() {
            if let (Some(source), TargetSlot::Matched(target)) = (&entry.source, &entry.target) {
                plan.insert(target.path.clone(), source.path.clone());
            }
        }
        plan
    }

    /// Record `old -> new`; in-place pairs are silently dropped.
    pub fn insert(&mut self, old: PathBuf, new: PathBuf) {
        if old == new {
            return;
        }
        self.reverse.insert(new.clone(), old.clone());
        self.forward.insert(old, new);
    }

    /// Number of pending renames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Whether nothing is left to rename.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// The planned destination for `old`, if any.
    #[must_use]
    pub fn get(&self, old: &Path) -> Option<&Path> {
        self.forward.get(old).map(PathBuf::as_path)
    }

    /// Iterate over the pending `(oldpath, newpath)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.forward
            .iter()
            .map(|(old, new)| (old.as_path(), new.as_path()))
    }

    /// Parse a plan from its JSON preview form.
    ///
    /// # Errors
    ///
    /// Returns [`PermutaError::Plan`] when the text is not a flat
    /// string-to-string object.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|err| PermutaError::Plan(err.to_string()))
    }

    /// Render the plan as its JSON preview form, keys sorted.
    ///
    /// # Errors
    ///
    /// Returns [`PermutaError::Plan`] when encoding fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|err| PermutaError::Plan(err.to_string()))
    }

    /// Drop pairs whose `oldpath` no longer exists under `root`.
    ///
    /// Used when replaying a saved preview against a tree that may have
    /// changed since the preview was produced.
    pub fn retain_existing(&mut self, root: &Path) {
        let stale: Vec<PathBuf> = self
            .forward
            .keys()
            .filter(|old| root.join(old).symlink_metadata().is_err())
            .cloned()
            .collect();
        for old in stale {
            if let Some(new) = self.forward.remove(&old) {
                debug!(
                    "dropping stale pair '{}' -> '{}'",
                    old.display(),
                    new.display()
                );
                self.reverse.remove(&new);
            }
        }
    }

    /// Execute the plan under `root`, consuming it.
    ///
    /// Chains are renamed from their safe end backward; cycles are broken by
    /// detaching one link onto a fresh temporary name in `root` first, at
    /// the cost of one extra rename. Individual rename failures are logged
    /// and skipped; already-processed links in the same chain stay renamed.
    ///
    /// # Errors
    ///
    /// Returns an error only when a temporary name cannot be created while
    /// breaking a cycle — at that point the target root itself is not
    /// writable and the remaining work would fail anyway.
    pub fn execute(mut self, root: &Path, overwrite: bool) -> Result<RenameStats> {
        let mut stats = RenameStats::default();
        let starts: Vec<PathBuf> = self.forward.keys().cloned().collect();
        for start in starts {
            // A single pass can consume several pairs when it hits a chain
            // or cycle; skip anything an earlier walk already processed.
            if self.forward.contains_key(&start) {
                self.process_chain(&start, root, overwrite, &mut stats)?;
            }
        }
        info!(
            "{} renamed, {} skipped, {} failed",
            stats.renamed, stats.skipped, stats.failed
        );
        Ok(stats)
    }

    fn process_chain(
        &mut self,
        start: &Path,
        root: &Path,
        overwrite: bool,
        stats: &mut RenameStats,
    ) -> Result<()> {
        let mut oldpath = start.to_path_buf();
        let Some(mut newpath) = self.forward.get(start).cloned() else {
            return Ok(());
        };

        // Forward to the end of the chain, or back around to the start.
        while newpath != *start {
            match self.forward.get(&newpath) {
                Some(next) => {
                    let next = next.clone();
                    oldpath = std::mem::replace(&mut newpath, next);
                }
                None => break,
            }
        }

        // A cycle has no safe end; detach the last link onto a temporary
        // name and splice that name in as the chain's new origin.
        if newpath == *start {
            let tmp = reserve_temp_name(root)?;
            rename_file(root, &oldpath, &tmp, true, stats);
            self.reverse.insert(start.to_path_buf(), tmp);
            self.forward.remove(&oldpath);
            let prev = self.reverse.get(&oldpath).cloned();
            newpath = oldpath;
            match prev {
                Some(prev) => oldpath = prev,
                None => return Ok(()),
            }
        }

        // Backward pass: the destination of each rename is free by the time
        // we reach it, because its own rename (if any) already happened.
        loop {
            rename_file(root, &oldpath, &newpath, overwrite, stats);
            self.forward.remove(&oldpath);
            let prev = self.reverse.get(&oldpath).cloned();
            newpath = oldpath;
            match prev {
                Some(prev) => oldpath = prev,
                None => return Ok(()),
            }
        }
    }
}

impl Serialize for RenamePlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let ordered: BTreeMap<String, String> = self
            .forward
            .iter()
            .map(|(old, new)| (old.display().to_string(), new.display().to_string()))
            .collect();
        ordered.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RenamePlan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        let mut plan = Self::new();
        for (old, new) in raw {
            if old.is_empty() || new.is_empty() {
                return Err(D::Error::custom("empty path in rename pair"));
            }
            plan.insert(PathBuf::from(old), PathBuf::from(new));
        }
        Ok(plan)
    }
}

/// Outcome counters for one execution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenameStats {
    /// Renames performed.
    pub renamed: u64,
    /// Renames skipped because the destination already existed.
    pub skipped: u64,
    /// Renames (or directory creations) that failed.
    pub failed: u64,
}

/// Reserve a unique relative name directly under `root`.
///
/// The placeholder file is removed again so the following rename can land on
/// the name; the gap until then is the same kind of race the destination
/// existence check already tolerates.
fn reserve_temp_name(root: &Path) -> Result<PathBuf> {
    let file = tempfile::Builder::new()
        .prefix("permuta-")
        .tempfile_in(root)?;
    let abs = file.path().to_path_buf();
    file.close()?;
    let rel = abs
        .strip_prefix(root)
        .map_err(|err| PermutaError::Io(io::Error::other(err)))?;
    Ok(rel.to_path_buf())
}

/// Perform one rename under `root`, honoring the overwrite policy.
fn rename_file(root: &Path, old: &Path, new: &Path, overwrite: bool, stats: &mut RenameStats) {
    let abs_old = root.join(old);
    let abs_new = root.join(new);

    if let Some(parent) = abs_new.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            warn!("cannot create '{}': {}", parent.display(), err);
            stats.failed += 1;
            return;
        }
    }

    // There is a window between this check and the rename; closing it would
    // take hard links, which not all filesystems offer.
    if !overwrite && abs_new.symlink_metadata().is_ok() {
        warn!(
            "Destination exists, skip renaming: '{}' -> '{}'",
            old.display(),
            new.display()
        );
        stats.skipped += 1;
        return;
    }

    match fs::rename(&abs_old, &abs_new) {
        Ok(()) => {
            info!("Rename '{}' -> '{}'", old.display(), new.display());
            stats.renamed += 1;
        }
        Err(err) => {
            warn!(
                "rename '{}' -> '{}' failed: {}",
                old.display(),
                new.display(),
                err
            );
            stats.failed += 1;
        }
    }
}
