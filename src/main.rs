//! Thin CLI over the counting engine: prints the distinct-address count for
//! one input file.

use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser;
use tracing::info;

use ipv4_uniq::{unique_ipv4_count, Config};

#[derive(Parser)]
#[command(
    name = "ipv4-uniq",
    about = "Count distinct IPv4 addresses in a line-oriented text file"
)]
struct Cli {
    /// Input file: one dotted-quad address per line
    path: PathBuf,

    /// Bitset shards / aggregator threads (non-positive selects the default)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    shards: i64,

    /// Parallel segment readers (non-positive selects the default)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    readers: i64,

    /// Per-reader block size in MiB (non-positive selects the default)
    #[arg(long = "bufMB", default_value_t = 0, allow_negative_numbers = true)]
    buf_mb: i64,

    /// Segment-alignment probe window in KiB (non-positive selects the default)
    #[arg(long = "probeKB", default_value_t = 0, allow_negative_numbers = true)]
    probe_kb: i64,
}

/// Non-positive flag values request the engine defaults.
fn tuned(v: i64) -> u64 {
    if v > 0 {
        v as u64
    } else {
        0
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = Config {
        shards: tuned(cli.shards) as usize,
        readers: tuned(cli.readers) as usize,
        block_bytes: (tuned(cli.buf_mb) << 20) as usize,
        probe_bytes: tuned(cli.probe_kb) << 10,
    };

    let started = Instant::now();
    match unique_ipv4_count(&cli.path, cfg) {
        Ok(count) => {
            info!(count, elapsed = ?started.elapsed(), "count complete");
            println!("{count}");
        }
        Err(err) => {
            eprintln!("ERR: {err}");
            process::exit(2);
        }
    }
}
