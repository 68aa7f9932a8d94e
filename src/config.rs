//! The core's enumerated configuration surface. No CLI, environment
//! variables, or persisted state are defined here — callers construct a
//! `Config` directly.

use crate::buffer::{BIG_BUFFER_SIZE, INITIAL_BUFFER_SIZE};
use crate::codec::MAX_PAYLOAD_SIZE;

/// Sequence-counter wrap point (`2^32 - 2`).
pub const SEQ_MAX: u32 = u32::MAX - 1;

/// Suggested pending-bytes cap for a transport driver (64 KiB). Purely
/// advisory: the core itself never refuses a `send_*` call because of it.
pub const OUTBUF_SOFT_MAX: usize = 64 * 1024;

/// Tunable limits for a [`crate::handler::StreamHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Starting capacity after a full outbound/decode buffer reset.
    pub initial_buffer_size: usize,
    /// Capacity threshold above which a reset reclaims down to `initial_buffer_size`.
    pub big_buffer_size: usize,
    /// Decoder `INVALID_SIZE` threshold.
    pub max_payload_size: u32,
    /// Sequence-counter wrap point.
    pub seq_max: u32,
    /// Suggested pending-bytes cap for the surrounding transport.
    pub outbuf_soft_max: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_buffer_size: INITIAL_BUFFER_SIZE,
            big_buffer_size: BIG_BUFFER_SIZE,
            max_payload_size: MAX_PAYLOAD_SIZE,
            seq_max: SEQ_MAX,
            outbuf_soft_max: OUTBUF_SOFT_MAX,
        }
    }
}
