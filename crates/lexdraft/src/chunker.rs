//! Fixed-size document chunking.
//!
//! Splits a document into contiguous, non-overlapping pieces of at most
//! `max_chars` characters. The split is purely length-based: it has no
//! knowledge of sentences or paragraphs and never inspects chunk content.

/// Default maximum chunk length in characters.
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 5000;

/// Split `document` into chunks of at most `max_chars` characters.
///
/// Lengths are counted in characters (Unicode scalar values), so a chunk
/// boundary never falls inside a multi-byte character. Every chunk except
/// the last has exactly `max_chars` characters, and concatenating the chunks
/// reproduces the document. An empty document yields no chunks.
///
/// A `max_chars` of zero is treated as one.
pub fn chunk_document(document: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::with_capacity(document.len() / max_chars + 1);

    let mut start = 0;
    let mut count = 0;
    for (offset, _) in document.char_indices() {
        if count == max_chars {
            chunks.push(&document[start..offset]);
            start = offset;
            count = 0;
        }
        count += 1;
    }
    if start < document.len() {
        chunks.push(&document[start..]);
    }

    chunks
}
