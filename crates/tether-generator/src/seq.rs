use crate::Generator;
use std::sync::atomic::{AtomicU64, Ordering};
use tether_core::shortcode::{CHARSET, GENERATED_LENGTH};
use tether_core::ShortCode;

/// A deterministic generator that counts upward in base 62.
///
/// Produces `aaaaaaa`, `aaaaaab`, ... using the same alphabet and length as
/// [`RandomGenerator`](crate::RandomGenerator). Codes are guessable, so this
/// is meant for tests and reproducible local runs.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
        }
    }
}

impl SeqGenerator {
    pub fn new() -> Self {
        Self::with_offset(0)
    }

    /// Starts counting from `offset` instead of zero.
    pub fn with_offset(offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
        }
    }

    fn encode(mut value: u64) -> String {
        let base = CHARSET.len() as u64;
        let mut out = vec![CHARSET[0]; GENERATED_LENGTH];
        for slot in out.iter_mut().rev() {
            *slot = CHARSET[(value % base) as usize];
            value /= base;
        }
        out.into_iter().map(char::from).collect()
    }
}

impl Default for SeqGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for SeqGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        ShortCode::generated(Self::encode(count))
    }
}
