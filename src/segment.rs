//! File segmentation with line-safe boundaries.
//!
//! `split` carves the file into coarse byte ranges; `align` then does
//! left-only alignment so every range after the first starts just past a
//! line terminator, and stitches the ranges back into a disjoint, gap-free
//! cover of the whole file. A terminator ends the line belonging to the
//! previous segment, so moving only the left edge keeps every line whole.

use std::fs::File;
use std::os::unix::fs::FileExt;

use memchr::memchr;

/// A contiguous byte range `[lo, hi)` assigned to exactly one reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Segment {
    pub lo: u64,
    pub hi: u64,
}

/// Divides `size` bytes into `parts` segments of roughly equal length.
pub(crate) fn split(size: u64, parts: usize) -> Vec<Segment> {
    if parts <= 1 || size == 0 {
        return vec![Segment { lo: 0, hi: size }];
    }
    let chunk = size / parts as u64;
    let mut out = Vec::with_capacity(parts);
    let mut lo = 0;
    for i in 0..parts {
        let hi = if i == parts - 1 { size } else { lo + chunk };
        out.push(Segment { lo, hi });
        lo = hi;
    }
    out
}

/// Left-aligns every segment after the first to the byte following the next
/// `\n` found within a `probe`-byte window, then stitches `hi[i] = lo[i+1]`
/// with the last segment ending at the original file end.
///
/// A window without a terminator (or a failed probe read) empties that
/// segment: its start collapses onto the next aligned start, so the previous
/// reader absorbs those bytes whole and no boundary ever lands inside a
/// line. A file with no terminator at all collapses everything onto the
/// first segment, whose reader still parses the unterminated tail.
pub(crate) fn align(file: &File, segs: &mut [Segment], probe: u64) {
    const UNALIGNED: u64 = u64::MAX;

    if probe < 1 || segs.is_empty() {
        return;
    }
    let orig: Vec<Segment> = segs.to_vec();
    let mut tmp = vec![0u8; probe as usize];

    for i in 1..segs.len() {
        let Segment { lo, hi } = orig[i];
        if lo >= hi {
            segs[i].lo = lo;
            continue;
        }
        let win = (hi - lo).min(probe) as usize;
        let n = file.read_at(&mut tmp[..win], lo).unwrap_or(0);
        segs[i].lo = match memchr(b'\n', &tmp[..n]) {
            Some(k) => lo + k as u64 + 1,
            None => UNALIGNED,
        };
    }
    segs[0].lo = orig[0].lo;

    // Collapse unaligned starts onto the next aligned one (or the file end).
    let mut next = orig[orig.len() - 1].hi;
    for i in (1..segs.len()).rev() {
        if segs[i].lo == UNALIGNED {
            segs[i].lo = next;
        } else {
            next = segs[i].lo;
        }
    }

    for i in 0..segs.len() - 1 {
        segs[i].hi = segs[i + 1].lo.max(segs[i].lo);
    }
    let last = segs.len() - 1;
    segs[last].hi = orig[last].hi.max(segs[last].lo);
}
