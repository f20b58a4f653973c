//! Identifier generation
//!
//! Ids are the decimal Unix-millisecond timestamp, followed by a short
//! base-36 segment and an 8-character segment drawn uniformly from the
//! 62-character alphanumeric alphabet. The randomness is not
//! cryptographically secure and ids are not formally collision-free; the
//! timestamp prefix plus ~93 random bits keeps practical collisions
//! negligible at gateway write rates.

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};

/// Length of the base-36 segment
pub const SHORT_SEGMENT_LEN: usize = 9;
/// Length of the alphanumeric tail
pub const SUFFIX_LEN: usize = 8;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub trait IdGenerator: Send + Sync {
    /// Produce a fresh opaque id. Never fails.
    fn generate(&self) -> String;
}

/// Timestamp-prefixed random id generator
#[derive(Clone)]
pub struct TimestampIdGenerator {
    clock: Arc<dyn Clock>,
}

impl TimestampIdGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl Default for TimestampIdGenerator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl IdGenerator for TimestampIdGenerator {
    fn generate(&self) -> String {
        let millis = self.clock.now().timestamp_millis();
        let mut rng = rand::thread_rng();

        let short: String = (0..SHORT_SEGMENT_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        let suffix: String = (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(SUFFIX_LEN)
            .map(char::from)
            .collect();

        format!("{millis}{short}{suffix}")
    }
}
