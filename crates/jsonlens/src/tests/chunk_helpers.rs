use alloc::vec::Vec;

/// Split `payload` into approximately equal-sized chunks without breaking
/// UTF-8 code points.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &str, parts: usize) -> Vec<&str> {
    assert!(parts > 0);
    let len = payload.len();
    let chunk_size = len.div_ceil(parts);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < len {
        let mut end = core::cmp::min(start + chunk_size, len);
        while end < len && !payload.is_char_boundary(end) {
            end += 1;
        }
        chunks.push(&payload[start..end]);
        start = end;
    }
    chunks
}

/// Split `payload` into byte chunks at the given positions, which need not
/// lie on character boundaries.
#[must_use]
pub fn byte_chunks<'a>(payload: &'a [u8], splits: &[usize]) -> Vec<&'a [u8]> {
    let mut points: Vec<usize> = splits
        .iter()
        .filter(|&&p| p > 0 && p < payload.len())
        .copied()
        .collect();
    points.sort_unstable();
    points.dedup();

    let mut chunks = Vec::with_capacity(points.len() + 1);
    let mut start = 0;
    for p in points {
        chunks.push(&payload[start..p]);
        start = p;
    }
    chunks.push(&payload[start..]);
    chunks
}

#[test]
fn byte_chunks_cover_the_payload() {
    let payload = b"hello world";
    let chunks = byte_chunks(payload, &[3, 3, 7, 0, 99]);
    let mut rebuilt = Vec::new();
    for c in &chunks {
        rebuilt.extend_from_slice(c);
    }
    assert_eq!(rebuilt, payload);
    assert_eq!(chunks.len(), 3);
}
