//! Window-slide search over a bounded byte range.

use memchr::memchr;

use super::Pattern;

/// Offset of the first window in `bytes` that matches `pattern`.
///
/// The last candidate window starts at `bytes.len() - pattern.len()`.
pub fn find_offset(bytes: &[u8], pattern: &Pattern) -> Option<usize> {
    let len = pattern.len();
    if len == 0 || bytes.len() < len {
        return None;
    }
    let last = bytes.len() - len;

    let Some((anchor, value)) = pattern.anchor() else {
        // Every window matches a wildcard-only pattern
        return Some(0);
    };

    let mut start = 0;
    while start <= last {
        let found = memchr(value, &bytes[start + anchor..=last + anchor])?;
        let candidate = start + found;
        if pattern.matches(&bytes[candidate..candidate + len]) {
            return Some(candidate);
        }
        start = candidate + 1;
    }

    None
}

/// Address of the first match, with `bytes[0]` living at `base`.
pub fn find_pattern(bytes: &[u8], base: usize, pattern: &Pattern) -> Option<usize> {
    find_offset(bytes, pattern).map(|offset| base + offset)
}

/// Every match in ascending order. Used to check that a signature is unique.
pub fn find_all(bytes: &[u8], base: usize, pattern: &Pattern) -> Vec<usize> {
    let mut results = Vec::new();
    let mut start = 0;

    while start < bytes.len() {
        match find_offset(&bytes[start..], pattern) {
            Some(offset) => {
                results.push(base + start + offset);
                start += offset + 1;
            }
            None => break,
        }
    }

    results
}

/// Scan live memory in `[start, start + max_size)`.
///
/// Returns `None` for a null start address.
///
/// # Safety
///
/// The whole range must be mapped and readable for the duration of the call,
/// and must not be unloaded or relocated while the scan runs.
pub unsafe fn find_pattern_raw(start: usize, max_size: usize, pattern: &Pattern) -> Option<usize> {
    if start == 0 || max_size < pattern.len() {
        return None;
    }

    // SAFETY: the caller guarantees the range is readable.
    let bytes = unsafe { std::slice::from_raw_parts(start as *const u8, max_size) };
    find_pattern(bytes, start, pattern)
}
