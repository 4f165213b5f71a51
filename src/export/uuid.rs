//! Version-4 UUID strings for element and texture identifiers.
//!
//! Bytes come from the OS RNG when `getrandom` works on this target, otherwise
//! from a seeded `StdRng`. Either way the output is a well-formed 36-character
//! RFC 4122 v4 UUID.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

const FALLBACK_SEED: u64 = 0x6c62_7678_5f75_7569;

enum Source {
    Os,
    Seeded(StdRng),
}

pub struct UuidGenerator {
    source: Source,
}

impl Default for UuidGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl UuidGenerator {
    /// Use the OS RNG if available, else the seeded fallback.
    pub fn new() -> Self {
        let mut probe = [0u8; 16];
        match getrandom::getrandom(&mut probe) {
            Ok(()) => Self { source: Source::Os },
            Err(e) => {
                log::warn!("No secure random source ({}), using seeded UUIDs", e);
                Self::seeded(FALLBACK_SEED)
            }
        }
    }

    /// Reproducible generator.
    pub fn seeded(seed: u64) -> Self {
        Self {
            source: Source::Seeded(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn is_secure(&self) -> bool {
        matches!(self.source, Source::Os)
    }

    pub fn generate(&mut self) -> String {
        let mut bytes = [0u8; 16];
        self.fill(&mut bytes);
        format_v4(bytes)
    }

    fn fill(&mut self, bytes: &mut [u8; 16]) {
        if let Source::Os = self.source {
            match getrandom::getrandom(bytes) {
                Ok(()) => return,
                Err(e) => {
                    log::warn!("Secure random source failed ({}), switching to seeded UUIDs", e);
                    self.source = Source::Seeded(StdRng::seed_from_u64(FALLBACK_SEED));
                }
            }
        }
        if let Source::Seeded(rng) = &mut self.source {
            rng.fill_bytes(bytes);
        }
    }
}

fn format_v4(mut b: [u8; 16]) -> String {
    b[6] = (b[6] & 0x0f) | 0x40;
    b[8] = (b[8] & 0x3f) | 0x80;
    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7], b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]
    )
}

/// Whether `s` is a hyphenated 36-character UUID.
pub fn is_uuid(s: &str) -> bool {
    s.len() == 36
        && s.char_indices().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => c == '-',
            _ => c.is_ascii_hexdigit(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    fn assert_v4(id: &str) {
        assert!(is_uuid(id), "not a uuid: {}", id);
        assert_eq!(&id[14..15], "4");
        assert!(matches!(&id[19..20], "8" | "9" | "a" | "b"), "bad variant: {}", id);
    }

    #[test]
    fn test_generated_uuids_are_v4() {
        let mut gen = UuidGenerator::new();
        for _ in 0..64 {
            assert_v4(&gen.generate());
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a: Vec<String> = {
            let mut g = UuidGenerator::seeded(7);
            (0..5).map(|_| g.generate()).collect()
        };
        let b: Vec<String> = {
            let mut g = UuidGenerator::seeded(7);
            (0..5).map(|_| g.generate()).collect()
        };
        assert_eq!(a, b);
        a.iter().for_each(|id| assert_v4(id));
        assert!(!UuidGenerator::seeded(7).is_secure());
    }

    #[test]
    fn test_uuids_are_unique() {
        let mut gen = UuidGenerator::seeded(1);
        let ids: FxHashSet<String> = (0..1000).map(|_| gen.generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_is_uuid() {
        assert!(is_uuid("123e4567-e89b-42d3-a456-426614174000"));
        assert!(!is_uuid("123e4567e89b42d3a456426614174000"));
        assert!(!is_uuid("123e4567-e89b-42d3-a456-42661417400g"));
        assert!(!is_uuid(""));
    }
}
