//! Polyglot-format opening book.
//!
//! A book file is a sequence of 16-byte big-endian records: an 8-byte
//! position key, a 2-byte bit-packed move, a 2-byte weight and a 4-byte
//! learn field (ignored). Lookup is a linear scan returning the first
//! record whose key matches, decoded to terse move notation.
//!
//! Keys must come from the same hash the engine uses ([`crate::zobrist`]),
//! so books are built against this engine's key table.

use std::fs;
use std::path::Path;

use log::{info, warn};

/// One 16-byte book record.
#[derive(Clone, Copy, Debug)]
struct BookEntry {
    key: u64,
    mv: u16,
}

/// An in-memory opening book. An empty book answers every probe with
/// `None`, so a missing file degrades gracefully.
#[derive(Default)]
pub struct Book {
    entries: Vec<BookEntry>,
}

impl Book {
    /// A book with no entries.
    #[must_use]
    pub fn empty() -> Book {
        Book::default()
    }

    /// Load a book file. Trailing bytes that do not fill a whole record are
    /// ignored (with a log notice).
    pub fn open<P: AsRef<Path>>(path: P) -> std::io::Result<Book> {
        let bytes = fs::read(&path)?;
        let mut entries = Vec::with_capacity(bytes.len() / 16);

        let mut chunks = bytes.chunks_exact(16);
        for chunk in &mut chunks {
            let key = u64::from_be_bytes(chunk[0..8].try_into().unwrap_or([0; 8]));
            let mv = u16::from_be_bytes(chunk[8..10].try_into().unwrap_or([0; 2]));
            entries.push(BookEntry { key, mv });
        }
        if !chunks.remainder().is_empty() {
            warn!(
                "book {}: {} trailing bytes ignored",
                path.as_ref().display(),
                chunks.remainder().len()
            );
        }

        info!(
            "book {}: {} entries",
            path.as_ref().display(),
            entries.len()
        );
        Ok(Book { entries })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First book move recorded for `hash`, in terse notation.
    #[must_use]
    pub fn lookup(&self, hash: u64) -> Option<String> {
        self.entries
            .iter()
            .find(|entry| entry.key == hash)
            .map(|entry| decode_move(entry.mv))
    }
}

/// Unpack a book move: bits 0-2 destination file, 3-5 destination rank,
/// 6-8 source file, 9-11 source rank, 12-14 promotion piece
/// (1=N, 2=B, 3=R, 4=Q).
fn decode_move(raw: u16) -> String {
    let to_file = raw & 7;
    let to_rank = (raw >> 3) & 7;
    let from_file = (raw >> 6) & 7;
    let from_rank = (raw >> 9) & 7;
    let promotion = (raw >> 12) & 7;

    let mut terse = String::with_capacity(5);
    terse.push((b'a' + from_file as u8) as char);
    terse.push((b'1' + from_rank as u8) as char);
    terse.push((b'a' + to_file as u8) as char);
    terse.push((b'1' + to_rank as u8) as char);
    match promotion {
        1 => terse.push('n'),
        2 => terse.push('b'),
        3 => terse.push('r'),
        4 => terse.push('q'),
        _ => {}
    }
    terse
}
