//! Segment readers: block I/O, carry handling, and shard dispatch.

use std::fs::File;
use std::io;
use std::os::unix::fs::FileExt;

use crossbeam_channel::Sender;
use memchr::memchr;

use crate::codec::parse_ipv4;
use crate::pool::{BatchPool, BATCH_SIZE};
use crate::segment::Segment;

/// Carry capacity. Any valid IPv4 line fits (`255.255.255.255\r` is 16
/// bytes); a longer tail cannot parse, so truncating it is harmless.
const CARRY_CAP: usize = 32;

/// Reads `[seg.lo, seg.hi)` in blocks of `block_bytes`, parses each line,
/// and routes addresses to the per-shard queues in pooled batches.
///
/// Lines split across blocks are reassembled through the carry buffer. When
/// `is_last` is set, an unterminated final line is still parsed. A failed
/// read ends the segment early; everything parsed so far is kept and all
/// pending batches are flushed, so aggregators always reach end-of-stream.
pub(crate) fn read_segment(
    file: &File,
    seg: Segment,
    is_last: bool,
    block_bytes: usize,
    queues: &[Sender<Vec<u32>>],
    pool: &BatchPool,
) {
    if seg.hi <= seg.lo {
        return;
    }
    let mut buf = vec![0u8; block_bytes];
    let mut local: Vec<Option<Vec<u32>>> = (0..queues.len()).map(|_| None).collect();
    let mut carry = [0u8; CARRY_CAP];
    let mut carry_len = 0usize;

    let mut pos = seg.lo;
    while pos < seg.hi {
        let want = ((seg.hi - pos) as usize).min(buf.len());
        let n = match file.read_at(&mut buf[..want], pos) {
            Ok(0) => break,
            Ok(n) => n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => break,
        };
        let chunk = &buf[..n];
        pos += n as u64;

        let mut i = 0;

        // Complete a line carried over from the previous block.
        if carry_len > 0 {
            match memchr(b'\n', chunk) {
                Some(k) => {
                    let need = (carry_len + k).min(CARRY_CAP);
                    carry[carry_len..need].copy_from_slice(&chunk[..need - carry_len]);
                    if let Some(ip) = parse_ipv4(strip_cr(&carry[..need])) {
                        dispatch(ip, &mut local, queues, pool);
                    }
                    carry_len = 0;
                    i = k + 1;
                }
                None => {
                    // Still no terminator; extend the carry as far as it goes.
                    let take = chunk.len().min(CARRY_CAP - carry_len);
                    carry[carry_len..carry_len + take].copy_from_slice(&chunk[..take]);
                    carry_len += take;
                    continue;
                }
            }
        }

        // Whole lines within the block.
        while let Some(j) = memchr(b'\n', &chunk[i..]) {
            if let Some(ip) = parse_ipv4(strip_cr(&chunk[i..i + j])) {
                dispatch(ip, &mut local, queues, pool);
            }
            i += j + 1;
        }

        // Stash the unterminated tail, keeping at most its last CARRY_CAP bytes.
        let tail = &chunk[i..];
        let tail = &tail[tail.len().saturating_sub(CARRY_CAP)..];
        carry[..tail.len()].copy_from_slice(tail);
        carry_len = tail.len();
    }

    // The file's final line may lack a terminator.
    if is_last && carry_len > 0 {
        if let Some(ip) = parse_ipv4(strip_cr(&carry[..carry_len])) {
            let sid = ip as usize % queues.len();
            let mut batch = pool.get();
            batch.push(ip);
            let _ = queues[sid].send(batch);
        }
    }

    for (sid, slot) in local.iter_mut().enumerate() {
        if let Some(batch) = slot.take() {
            if !batch.is_empty() {
                let _ = queues[sid].send(batch);
            }
        }
    }
}

#[inline]
fn strip_cr(line: &[u8]) -> &[u8] {
    match line {
        [head @ .., b'\r'] => head,
        _ => line,
    }
}

#[inline]
fn dispatch(
    ip: u32,
    local: &mut [Option<Vec<u32>>],
    queues: &[Sender<Vec<u32>>],
    pool: &BatchPool,
) {
    let sid = ip as usize % queues.len();
    let batch = local[sid].get_or_insert_with(|| pool.get());
    batch.push(ip);
    if batch.len() >= BATCH_SIZE {
        if let Some(full) = local[sid].take() {
            let _ = queues[sid].send(full);
        }
    }
}
