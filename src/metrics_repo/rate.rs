// Counter-pair to rate derivation

/// Floor for elapsed time between two counter reads. Back-to-back calls
/// must never divide by zero.
pub const MIN_ELAPSED_SECS: f64 = 1e-6;

/// MB/s uses the binary megabyte, matching how the shell labels speeds.
pub const BYTES_PER_MB: f64 = 1_048_576.0;

/// Derives non-negative rates from monotonically increasing counters.
///
/// The noise floor zeroes rates below a small threshold to suppress jitter
/// from counter granularity; it is a presentation policy (configurable via
/// `[sampling] noise_floor_mbps`), not a correctness requirement, and only
/// applies to the MB/s helpers, never to `rate()` itself.
#[derive(Debug, Clone, Copy)]
pub struct RateCalculator {
    noise_floor_mbps: f64,
}

impl RateCalculator {
    pub fn new(noise_floor_mbps: f64) -> Self {
        Self { noise_floor_mbps }
    }

    /// Raw rate in units/sec. Negative deltas (counter reset, wraparound,
    /// clock skew) clamp to zero; a monitoring value never reads negative.
    pub fn rate(&self, current: u64, previous: u64, elapsed_secs: f64) -> f64 {
        let elapsed = elapsed_secs.max(MIN_ELAPSED_SECS);
        if current < previous {
            return 0.0;
        }
        (current - previous) as f64 / elapsed
    }

    /// Byte-counter rate in MB/s with the noise floor applied.
    pub fn rate_mbps(&self, current: u64, previous: u64, elapsed_secs: f64) -> f64 {
        let mbps = self.rate(current, previous, elapsed_secs) / BYTES_PER_MB;
        if mbps < self.noise_floor_mbps {
            0.0
        } else {
            mbps
        }
    }

    /// Noise floor applied to an already-derived MB/s figure (used for the
    /// estimated per-disk shares, which are not counter pairs).
    pub fn denoise_mbps(&self, mbps: f64) -> f64 {
        if mbps < self.noise_floor_mbps {
            0.0
        } else {
            mbps
        }
    }
}

impl Default for RateCalculator {
    fn default() -> Self {
        Self::new(0.01)
    }
}
