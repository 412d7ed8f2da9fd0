//! Byte-level helpers shared by the segmenter, the interval filter and the
//! layout parsers.
//!
//! Everything here works on raw `&[u8]` so that records never need to be
//! decoded before we know which parts of them are wanted.

/// Position of the first occurrence of `needle` in `haystack`.
///
/// An empty needle never matches.
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Position of the first `\n` in `bytes`.
pub fn find_newline(bytes: &[u8]) -> Option<usize> {
    bytes.iter().position(|&b| b == b'\n')
}

/// Strip any of `chars` from both ends of `bytes`.
pub fn trim_matches<'a>(bytes: &'a [u8], chars: &[u8]) -> &'a [u8] {
    let start = bytes.iter().position(|b| !chars.contains(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !chars.contains(b)).map(|p| p + 1).unwrap_or(0);
    if start < end { &bytes[start..end] } else { &[] }
}

/// Split a record into lines on `\n`, dropping a trailing `\r` from each.
pub fn lines(record: &[u8]) -> impl Iterator<Item = &[u8]> {
    record
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}
