//! # Permuta
//!
//! Filesystem hierarchy rename synchronizer.
//!
//! Permuta renames files in a TARGET tree so that files byte-identical to
//! files in a SOURCE tree end up at the same relative path as in SOURCE,
//! without copying any data. It is a pre-pass for generic sync tools:
//! renames are cheap, transfers are expensive.
//!
//! ## How it works
//!
//! - **Rolling digests**: files are fingerprinted by size first, then by a
//!   cumulative BLAKE3 digest refined one block at a time, only as far as
//!   needed to tell same-size files apart.
//! - **Two scan phases**: SOURCE is scanned completely, resolving
//!   source-side duplicates; TARGET is then scanned against the settled
//!   table, resolving target-side and cross-side conflicts.
//! - **Safe rename order**: the resulting `oldpath -> newpath` relation is
//!   executed chain by chain from the safe end backward, breaking cycles
//!   with one temporary name, so no pending rename ever clobbers data
//!   another one still needs.
//!
//! Matches are approximate by design: two distinct files that are the only
//! ones of their size can be mis-paired. The preview output exists so such
//! false positives can be spotted (and edited out) before processing.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use permuta::{MatchTable, Matcher, RenamePlan};
//!
//! # fn main() -> permuta::Result<()> {
//! let matcher = Matcher::new();
//! let mut table = MatchTable::new();
//! matcher.scan_source(Path::new("backup"), &mut table)?;
//! matcher.scan_target(Path::new("working"), Path::new("backup"), &mut table)?;
//!
//! let plan = RenamePlan::from_table(&table);
//! println!("{}", plan.to_json()?);
//!
//! let stats = plan.execute(Path::new("working"), false)?;
//! println!("{} files renamed", stats.renamed);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

mod digest;
mod error;
mod rename;
mod scan;
mod table;

pub use digest::{Digest, FileRecord, Fingerprint, Roll, RollingReader, DEFAULT_BLOCK_SIZE};
pub use error::{PermutaError, Result};
pub use rename::{RenamePlan, RenameStats};
pub use scan::{Matcher, MatcherBuilder, MatcherConfig};
pub use table::{MatchEntry, MatchTable, TargetSlot};
