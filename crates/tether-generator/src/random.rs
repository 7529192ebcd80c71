use crate::Generator;
use rand::Rng;
use tether_core::shortcode::{CHARSET, GENERATED_LENGTH};
use tether_core::ShortCode;

/// Random short codes drawn uniformly from `[a-zA-Z0-9]`.
///
/// Uses the thread-local CSPRNG (`rand::rng()`), which is seeded from the
/// operating system, so codes cannot be predicted from earlier ones.
#[derive(Debug, Clone, Copy)]
pub struct RandomGenerator {
    length: usize,
}

impl RandomGenerator {
    /// A generator producing codes of the standard length.
    pub fn new() -> Self {
        Self {
            length: GENERATED_LENGTH,
        }
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        let mut rng = rand::rng();
        let code: String = (0..self.length)
            .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
            .collect();
        ShortCode::generated(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_have_expected_shape() {
        let generator = RandomGenerator::new();
        for _ in 0..1_000 {
            let code = generator.generate();
            assert!(matches!(code, ShortCode::Generated(_)));
            assert!(
                ShortCode::is_generated_shape(code.as_str()),
                "bad code {code}"
            );
        }
    }

    #[test]
    fn codes_are_not_repeated() {
        let generator = RandomGenerator::new();
        let codes: HashSet<String> = (0..1_000)
            .map(|_| generator.generate().into_string())
            .collect();
        // 62^7 possibilities; a duplicate in 1000 draws is practically impossible
        assert_eq!(codes.len(), 1_000);
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandomGenerator>();
    }
}
