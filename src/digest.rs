//! Incremental rolling digest over fixed-size file blocks.
//!
//! A file's content is identified by a [`Fingerprint`]: its size, the number
//! of digest rolls performed, and the cumulative BLAKE3 digest of the bytes
//! consumed so far. Rolling one more block refines the fingerprint, which is
//! the unit of "more precision" used by the conflict-resolution machinery.

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Default number of bytes consumed by one digest roll.
///
/// Commonly a good fit for the device block size; configurable per run
/// through [`MatcherBuilder::block_size`](crate::MatcherBuilder::block_size).
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// Raw digest bytes produced by the accumulator.
pub type Digest = [u8; 32];

/// Identifies a file's content up to a known prefix length.
///
/// `rolls == 0` (and `digest == None`) is the size-only fingerprint: no
/// bytes have been hashed yet. After `k` rolls the fingerprint covers the
/// first `k * block_size` bytes, clamped to end of file. Equality is exact
/// on all three fields, so fingerprints at different roll counts never
/// compare equal even when their digests would later coincide.
///
/// # Example
///
/// ```rust
/// use permuta::Fingerprint;
///
/// let a = Fingerprint::of_size(1024);
/// let b = Fingerprint::of_size(1024);
/// assert_eq!(a, b);
/// assert!(!a.is_hashed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    /// File size in bytes; always set.
    pub size: u64,
    /// Number of digest rolls performed.
    pub rolls: u32,
    /// Cumulative digest over all bytes consumed, `None` before the first roll.
    pub digest: Option<Digest>,
}

impl Fingerprint {
    /// Create the size-only fingerprint a file starts out with.
    #[must_use]
    pub const fn of_size(size: u64) -> Self {
        Self {
            size,
            rolls: 0,
            digest: None,
        }
    }

    /// Whether any bytes have been hashed yet.
    #[must_use]
    pub const fn is_hashed(&self) -> bool {
        self.rolls > 0
    }

    /// Hex rendering of the digest for diagnostics; empty before the first roll.
    #[must_use]
    pub fn hex(&self) -> String {
        use fmt::Write as _;

        let mut out = String::with_capacity(64);
        if let Some(digest) = &self.digest {
            for byte in digest {
                let _ = write!(out, "{byte:02x}");
            }
        }
        out
    }
}

/// One physical file being tracked during a scan.
///
/// Owns the incremental digest accumulator: the digest state is only ever
/// advanced through this record's own rolls, never shared between files.
#[derive(Clone)]
pub struct FileRecord {
    /// Path relative to the tree root the file was discovered under.
    pub path: PathBuf,
    /// Byte length, captured once at discovery.
    pub size: u64,
    hasher: blake3::Hasher,
}

impl FileRecord {
    /// Create a record for a freshly discovered file.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            hasher: blake3::Hasher::new(),
        }
    }
}

impl fmt::Debug for FileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileRecord")
            .field("path", &self.path)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Outcome of one digest roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Roll {
    /// More blocks remain past the bytes consumed so far.
    Advanced,
    /// The roll reached end of file; the fingerprint is final.
    Exhausted,
}

impl Roll {
    /// Whether this roll reached end of file.
    #[must_use]
    pub const fn is_exhausted(self) -> bool {
        matches!(self, Self::Exhausted)
    }
}

/// Scoped reader driving the digest rolls of a single record.
///
/// The underlying file is opened lazily on the first roll and kept open
/// across rolls to avoid repeated open/close cost. The reader is bound to
/// the scan visit, not to the record: a record can outlive the visit by
/// being retired into the fingerprint table, while the handle is closed on
/// every control-flow exit of the visit when the reader drops.
pub struct RollingReader {
    abs_path: PathBuf,
    file: Option<File>,
    buf: Vec<u8>,
}

impl RollingReader {
    /// Create a reader for the file at `abs_path`; nothing is opened yet.
    #[must_use]
    pub fn new(abs_path: PathBuf, block_size: usize) -> Self {
        Self {
            abs_path,
            file: None,
            buf: vec![0u8; block_size],
        }
    }

    /// The absolute path this reader rolls over.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.abs_path
    }

    /// Consume one block and refine the fingerprint.
    ///
    /// Reads one block at offset `key.rolls * block_size` (a short or empty
    /// read at end of file is fine), feeds the bytes into the record's
    /// accumulator, increments the roll count, and recomputes the digest
    /// over everything consumed so far. Exhaustion is a function of size
    /// alone, so two records of equal size always exhaust on the same roll:
    /// `(rolls - 1) * block_size < size <= rolls * block_size`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened or read; the
    /// fingerprint is left unchanged and the caller must treat the record
    /// as unreadable from this point on.
    pub fn roll(&mut self, record: &mut FileRecord, key: &mut Fingerprint) -> io::Result<Roll> {
        let file = match &mut self.file {
            Some(file) => file,
            empty => empty.insert(File::open(&self.abs_path)?),
        };

        let block_size = self.buf.len() as u64;
        file.seek(SeekFrom::Start(u64::from(key.rolls) * block_size))?;

        let mut filled = 0;
        while filled < self.buf.len() {
            match file.read(&mut self.buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }

        record.hasher.update(&self.buf[..filled]);
        key.rolls += 1;
        key.digest = Some(*record.hasher.finalize().as_bytes());

        if u64::from(key.rolls) * block_size >= key.size {
            Ok(Roll::Exhausted)
        } else {
            Ok(Roll::Advanced)
        }
    }
}

impl fmt::Debug for RollingReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollingReader")
            .field("abs_path", &self.abs_path)
            .field("open", &self.file.is_some())
            .field("block_size", &self.buf.len())
            .finish()
    }
}
