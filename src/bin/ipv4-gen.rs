//! Corpus generator CLI: writes a file of random dotted-quad lines for
//! exercising the counter at scale.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use ipv4_uniq::gen::write_corpus;

#[derive(Parser)]
#[command(name = "ipv4-gen", about = "Generate a synthetic IPv4 line corpus")]
struct Cli {
    /// Target file size in bytes
    #[arg(long, default_value_t = 1 << 30)]
    size: u64,

    /// Output path
    #[arg(long, default_value = "ips.txt")]
    out: PathBuf,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn run(cli: &Cli) -> io::Result<u64> {
    let file = File::create(&cli.out)?;
    let mut w = BufWriter::with_capacity(1 << 20, file);
    let mut rng = StdRng::seed_from_u64(cli.seed);
    let written = write_corpus(&mut w, cli.size, &mut rng)?;
    w.flush()?;
    Ok(written)
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
    if cli.size == 0 {
        eprintln!("ERR: --size must be greater than zero");
        process::exit(2);
    }
    match run(&cli) {
        Ok(written) => info!(path = %cli.out.display(), written, "corpus generated"),
        Err(err) => {
            eprintln!("ERR: {err}");
            process::exit(2);
        }
    }
}
