//! Pipeline assembly: configuration, aggregators, and the public operation.

use std::fs::File;
use std::path::Path;
use std::thread;

use crossbeam_channel::{bounded, Receiver};
use thread_priority::ThreadPriority;
use tracing::debug;

use crate::bitset::ShardBitset;
use crate::error::{Error, Result};
use crate::pool::BatchPool;
use crate::reader::read_segment;
use crate::segment;

/// Batches queued per shard before readers block (backpressure).
const QUEUE_DEPTH: usize = 64;

/// Tuning knobs for [`unique_ipv4_count`]. A zero field requests the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    /// Bitset shards, each owned by one aggregator thread.
    /// Default `min(num_cpu * 4, 64)`.
    pub shards: usize,
    /// Parallel segment readers. Default `min(num_cpu, 8)`.
    pub readers: usize,
    /// Per-reader block size in bytes. Default 32 MiB.
    pub block_bytes: usize,
    /// Segment-alignment probe window in bytes. Default 4 KiB.
    pub probe_bytes: u64,
}

impl Config {
    fn shards_or_default(&self) -> usize {
        match self.shards {
            0 => (num_cpus::get() * 4).clamp(1, 64),
            s => s,
        }
    }

    fn readers_or_default(&self) -> usize {
        match self.readers {
            0 => num_cpus::get().clamp(1, 8),
            r => r,
        }
    }

    fn block_or_default(&self) -> usize {
        match self.block_bytes {
            0 => 32 << 20,
            b => b,
        }
    }

    fn probe_or_default(&self) -> u64 {
        match self.probe_bytes {
            0 => 4 << 10,
            p => p,
        }
    }
}

/// Counts the distinct IPv4 addresses in the line-oriented file at `path`.
///
/// The file is divided into `readers` line-aligned segments read in parallel
/// through one shared handle; parsed addresses are routed by `ip % shards`
/// to aggregator-owned bitsets whose population counts sum to the result.
/// Lines that are not dotted-quad addresses are ignored. Only open/stat
/// failures return an error.
pub fn unique_ipv4_count<P: AsRef<Path>>(path: P, cfg: Config) -> Result<u64> {
    let shards = cfg.shards_or_default();
    let readers = cfg.readers_or_default();
    let block_bytes = cfg.block_or_default();
    let probe_bytes = cfg.probe_or_default();

    let path = path.as_ref();
    let file = File::open(path)?;
    let meta = file.metadata()?;
    if !meta.is_file() {
        return Err(Error::NotAFile(path.to_path_buf()));
    }
    let size = meta.len();

    // Exact 2^32 coverage split across shards; the last shard's overshoot
    // bits are never set.
    let total_bits = 1u64 << 32;
    let bits_per_shard = (total_bits + shards as u64 - 1) / shards as u64;

    let mut segs = segment::split(size, readers);
    segment::align(&file, &mut segs, probe_bytes);
    debug!(
        shards,
        readers, block_bytes, probe_bytes, size, "pipeline configured"
    );

    let pool = BatchPool::new();
    let (txs, rxs): (Vec<_>, Vec<_>) = (0..shards)
        .map(|_| bounded::<Vec<u32>>(QUEUE_DEPTH))
        .unzip();

    let total = thread::scope(|s| {
        let aggregators: Vec<_> = rxs
            .into_iter()
            .map(|rx| {
                let pool = &pool;
                s.spawn(move || aggregate(rx, shards as u64, bits_per_shard, pool))
            })
            .collect();

        let reader_handles: Vec<_> = segs
            .iter()
            .map(|&seg| {
                let outs = txs.clone();
                let (file, pool) = (&file, &pool);
                let is_last = seg.hi == size;
                s.spawn(move || {
                    let _ = thread_priority::set_current_thread_priority(ThreadPriority::Max);
                    read_segment(file, seg, is_last, block_bytes, &outs, pool);
                })
            })
            .collect();

        // Each reader owns a clone of the sender set; dropping the originals
        // here means the queues close exactly when the last reader exits.
        drop(txs);

        for handle in reader_handles {
            handle.join().expect("reader thread panicked");
        }
        aggregators
            .into_iter()
            .map(|h| h.join().expect("aggregator thread panicked"))
            .sum()
    });

    Ok(total)
}

/// Consumes batches for one shard until every reader is done, then reports
/// the shard's population count.
fn aggregate(rx: Receiver<Vec<u32>>, shards: u64, bits: u64, pool: &BatchPool) -> u64 {
    let mut set = ShardBitset::new(bits);
    for batch in rx.iter() {
        for &ip in &batch {
            set.set(ip as u64 / shards);
        }
        pool.put(batch);
    }
    set.count()
}
