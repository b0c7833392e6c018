//! Little-endian field access over fixed byte layouts.
//!
//! All multi-byte integers on the command channel, in response buffers
//! and in persisted blocks are little-endian. Offsets passed here come
//! from documented layout constants, so callers guarantee they are in
//! bounds for the buffer they index.

// ── Readers ─────────────────────────────────────────────────────

/// Read a little-endian u16 at `at`.
pub fn get_u16(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}

/// Read a little-endian i16 at `at`.
pub fn get_i16(buf: &[u8], at: usize) -> i16 {
    i16::from_le_bytes([buf[at], buf[at + 1]])
}

/// Read a little-endian 24-bit value at `at` into the low bytes of a u32.
pub fn get_u24(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], 0])
}

/// Read a little-endian u32 at `at`.
pub fn get_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

// ── Writers ─────────────────────────────────────────────────────

/// Write a little-endian u16 at `at`.
pub fn put_u16(buf: &mut [u8], at: usize, v: u16) {
    buf[at..at + 2].copy_from_slice(&v.to_le_bytes());
}

/// Write a little-endian u32 at `at`.
pub fn put_u32(buf: &mut [u8], at: usize, v: u32) {
    buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

// ── Appenders ───────────────────────────────────────────────────

/// Append a little-endian u16.
pub fn push_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

/// Append the low three bytes of `v`, little-endian.
pub fn push_u24(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes()[..3]);
}

/// Append a little-endian u32.
pub fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}
