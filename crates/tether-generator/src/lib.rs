//! Short code generation and collision-free allocation.

pub mod random;
pub mod seq;

use tether_core::{KeySpace, ShortCode};
use thiserror::Error;
use tracing::warn;

pub use random::RandomGenerator;
pub use seq::SeqGenerator;

/// Upper bound on generate-and-check rounds in [`allocate`].
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("no free short code found after {attempts} attempts")]
    CapacityExhausted { attempts: usize },
}

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage;
/// uniqueness against existing keys is enforced by [`allocate`].
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;

    /// Produces a candidate short code.
    fn generate(&self) -> Self::Output;
}

/// Draws candidates from `generator` until one is absent from `keyspace`.
///
/// Gives up with [`GeneratorError::CapacityExhausted`] after `max_attempts`
/// candidates collided.
pub fn allocate<G, K>(
    generator: &G,
    keyspace: &K,
    max_attempts: usize,
) -> Result<ShortCode, GeneratorError>
where
    G: Generator + ?Sized,
    K: KeySpace + ?Sized,
{
    for attempt in 1..=max_attempts {
        let code: ShortCode = generator.generate().into();
        if !keyspace.contains(code.as_str()) {
            return Ok(code);
        }
        warn!(code = %code, attempt, "generated short code collided");
    }

    Err(GeneratorError::CapacityExhausted {
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Replays a fixed list of codes, repeating the last one forever.
    struct Scripted {
        codes: Mutex<Vec<&'static str>>,
    }

    impl Scripted {
        fn new(mut codes: Vec<&'static str>) -> Self {
            codes.reverse();
            Self {
                codes: Mutex::new(codes),
            }
        }
    }

    impl Generator for Scripted {
        type Output = ShortCode;

        fn generate(&self) -> ShortCode {
            let mut codes = self.codes.lock().unwrap();
            let next = if codes.len() > 1 {
                codes.pop().unwrap()
            } else {
                codes[0]
            };
            ShortCode::generated(next)
        }
    }

    fn taken(codes: &[&str]) -> HashSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn allocate_returns_first_free_code() {
        let generator = Scripted::new(vec!["aaaaaaa", "bbbbbbb", "ccccccc"]);
        let keyspace = taken(&["aaaaaaa", "bbbbbbb"]);

        let code = allocate(&generator, &keyspace, DEFAULT_MAX_ATTEMPTS).unwrap();
        assert_eq!(code.as_str(), "ccccccc");
    }

    #[test]
    fn allocate_skips_alias_keys_too() {
        // aliases live in the same key space as generated codes
        let generator = Scripted::new(vec!["my-page", "abc1234"]);
        let keyspace = taken(&["my-page"]);

        let code = allocate(&generator, &keyspace, DEFAULT_MAX_ATTEMPTS).unwrap();
        assert_eq!(code.as_str(), "abc1234");
    }

    #[test]
    fn allocate_gives_up_after_max_attempts() {
        let generator = Scripted::new(vec!["aaaaaaa"]);
        let keyspace = taken(&["aaaaaaa"]);

        let err = allocate(&generator, &keyspace, 5).unwrap_err();
        assert_eq!(err, GeneratorError::CapacityExhausted { attempts: 5 });
    }

    #[test]
    fn allocate_with_random_generator_avoids_existing_codes() {
        let generator = RandomGenerator::new();
        let mut keyspace = HashSet::new();

        for _ in 0..500 {
            let code = allocate(&generator, &keyspace, DEFAULT_MAX_ATTEMPTS).unwrap();
            assert!(ShortCode::is_generated_shape(code.as_str()));
            assert!(keyspace.insert(code.into_string()));
        }
    }
}
