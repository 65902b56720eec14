//! Dotted-quad IPv4 decoding.

/// Parses `A.B.C.D` into a network-order `u32` (`A<<24 | B<<16 | C<<8 | D`).
///
/// Each component is one to three ASCII digits with value `0..=255`; leading
/// zeros are fine. A single trailing `'\r'` is accepted so that CRLF residue
/// a reader did not strip still decodes. Anything else returns `None`.
///
/// Walks the slice once with constant state and never allocates.
#[inline]
pub fn parse_ipv4(b: &[u8]) -> Option<u32> {
    let (a0, n) = dec3(b, 0);
    if n == 0 || n >= b.len() || b[n] != b'.' || a0 > 255 {
        return None;
    }
    let i = n + 1;
    let (a1, n) = dec3(b, i);
    if n == i || n >= b.len() || b[n] != b'.' || a1 > 255 {
        return None;
    }
    let i = n + 1;
    let (a2, n) = dec3(b, i);
    if n == i || n >= b.len() || b[n] != b'.' || a2 > 255 {
        return None;
    }
    let i = n + 1;
    let (a3, n) = dec3(b, i);
    if n == i || a3 > 255 {
        return None;
    }
    // Require exact end or a single trailing '\r'.
    if n != b.len() && !(n + 1 == b.len() && b[n] == b'\r') {
        return None;
    }
    Some((a0 << 24) | (a1 << 16) | (a2 << 8) | a3)
}

/// Parses up to three ASCII digits starting at index `i`.
/// Returns the value and the index just past the last digit consumed.
#[inline]
fn dec3(b: &[u8], mut i: usize) -> (u32, usize) {
    let n = b.len();
    if i >= n || !b[i].is_ascii_digit() {
        return (0, i);
    }
    let mut v = (b[i] - b'0') as u32;
    i += 1;
    if i < n && b[i].is_ascii_digit() {
        v = v * 10 + (b[i] - b'0') as u32;
        i += 1;
        if i < n && b[i].is_ascii_digit() {
            v = v * 10 + (b[i] - b'0') as u32;
            i += 1;
        }
    }
    (v, i)
}
