use std::collections::HashSet;

use crate::types::{Chunk, CHUNK_SIZE};

/// Group a partition's lines into fixed-size chunks, padding the trailing
/// chunk with `None`.
pub fn chunk_lines<'a>(lines: &[&'a str]) -> Vec<Chunk<'a>> {
    lines
        .chunks(CHUNK_SIZE)
        .map(|group| {
            let mut chunk: Chunk<'a> = [None; CHUNK_SIZE];
            for (slot, line) in chunk.iter_mut().zip(group) {
                *slot = Some(line);
            }
            chunk
        })
        .collect()
}

/// Number of chunks remaining after exact duplicates are removed, order
/// discarded. Duplication is partition-local: duplicates that span a
/// partition boundary are not detected.
pub fn distinct_chunk_count(lines: &[&str]) -> usize {
    chunk_lines(lines).into_iter().collect::<HashSet<_>>().len()
}

/// Repository duplication percentage:
/// `100 * (total_lines - sum of per-partition distinct chunks) / total_lines`.
///
/// Returns `None` when the line stream is empty; the metric is unavailable
/// then, not zero. The value is reported as-is, never clamped.
pub fn duplication_percentage(total_lines: usize, distinct_chunks: usize) -> Option<f64> {
    if total_lines == 0 {
        return None;
    }
    Some(100.0 * (total_lines as f64 - distinct_chunks as f64) / total_lines as f64)
}
