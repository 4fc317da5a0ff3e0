//! Opening book reader.
//!
//! The whole file is loaded into memory and validated once; lookups are two
//! binary searches over the sorted entries.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::encoding::{BookEntry, ENTRY_SIZE};
use crate::error::BookError;

#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    entries: Vec<BookEntry>,
}

impl OpeningBook {
    /// Load and validate a book file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BookError> {
        let bytes = fs::read(path.as_ref())?;
        let book = Self::from_bytes(&bytes)?;
        debug!(
            path = %path.as_ref().display(),
            entries = book.len(),
            "Loaded opening book"
        );
        Ok(book)
    }

    /// Parse a book from raw bytes. The length must be a multiple of 16 and the
    /// keys must be non-decreasing.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BookError> {
        if bytes.len() % ENTRY_SIZE != 0 {
            return Err(BookError::Length { len: bytes.len() });
        }

        let entries: Vec<BookEntry> = bytes
            .chunks_exact(ENTRY_SIZE)
            .map(|chunk| {
                let mut raw = [0u8; ENTRY_SIZE];
                raw.copy_from_slice(chunk);
                BookEntry::from_bytes(&raw)
            })
            .collect();

        if let Some(i) = entries.windows(2).position(|w| w[0].key > w[1].key) {
            return Err(BookError::Unsorted { index: i + 1 });
        }

        Ok(Self { entries })
    }

    /// All entries recorded for `key`, in file order. Empty if none.
    pub fn find_all(&self, key: u64) -> &[BookEntry] {
        let start = self.entries.partition_point(|e| e.key < key);
        let end = start + self.entries[start..].partition_point(|e| e.key == key);
        &self.entries[start..end]
    }

    pub fn entries(&self) -> &[BookEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
