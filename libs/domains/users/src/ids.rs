use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier assignment strategy.
///
/// Sequential ids are decimal strings from an owned counter and are never
/// reused after deletion. Random ids are 16 random bytes, hex-encoded.
#[derive(Debug)]
pub enum IdGenerator {
    Sequential(AtomicU64),
    Random,
}

impl IdGenerator {
    pub fn sequential() -> Self {
        IdGenerator::Sequential(AtomicU64::new(0))
    }

    pub fn random() -> Self {
        IdGenerator::Random
    }

    pub fn generate(&self) -> String {
        match self {
            IdGenerator::Sequential(counter) => {
                (counter.fetch_add(1, Ordering::Relaxed) + 1).to_string()
            }
            IdGenerator::Random => {
                let random_bytes: Vec<u8> = (0..16).map(|_| rand::random::<u8>()).collect();
                const_hex::encode(random_bytes)
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::sequential()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids_count_up_from_one() {
        let ids = IdGenerator::sequential();
        assert_eq!(ids.generate(), "1");
        assert_eq!(ids.generate(), "2");
        assert_eq!(ids.generate(), "3");
    }

    #[test]
    fn test_random_ids_are_hex_and_distinct() {
        let ids = IdGenerator::random();
        let a = ids.generate();
        let b = ids.generate();

        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
