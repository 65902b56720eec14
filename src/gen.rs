//! Synthetic corpus generation for benchmarks and load tests.

use std::fmt::Write as _;
use std::io::{self, Write};

use rand::Rng;

/// Writes random dotted-quad lines to `w` until at least `target_bytes`
/// bytes have been emitted. Returns the number of bytes written.
pub fn write_corpus<W: Write, R: Rng>(
    w: &mut W,
    target_bytes: u64,
    rng: &mut R,
) -> io::Result<u64> {
    let mut written = 0u64;
    let mut line = String::with_capacity(16);
    while written < target_bytes {
        line.clear();
        let _ = writeln!(
            line,
            "{}.{}.{}.{}",
            rng.gen::<u8>(),
            rng.gen::<u8>(),
            rng.gen::<u8>(),
            rng.gen::<u8>()
        );
        w.write_all(line.as_bytes())?;
        written += line.len() as u64;
    }
    Ok(written)
}
