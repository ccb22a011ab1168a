//! Monotonic ULID generation
//!
//! Ids generated within the same millisecond are strictly increasing, so
//! rapid-fire creation never yields duplicate or out-of-order identifiers.

use std::sync::{Mutex, OnceLock};
use ulid::{Generator, Ulid};

static GENERATOR: OnceLock<Mutex<Generator>> = OnceLock::new();

/// Generate a ULID that is monotonic within this process.
///
/// Falls back to a fresh random ULID in the (practically unreachable) case
/// where the monotonic counter overflows within a single millisecond.
pub fn generate_monotonic_ulid() -> Ulid {
    let generator = GENERATOR.get_or_init(|| Mutex::new(Generator::new()));
    let mut generator = generator
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    generator.generate().unwrap_or_else(|_| Ulid::new())
}

/// Generate a monotonic ULID rendered as its canonical 26-character string.
pub fn generate_monotonic_ulid_string() -> String {
    generate_monotonic_ulid().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ulids_are_unique_and_ordered() {
        let mut previous = generate_monotonic_ulid();
        for _ in 0..1000 {
            let next = generate_monotonic_ulid();
            assert!(next > previous, "expected strictly increasing ULIDs");
            previous = next;
        }
    }

    #[test]
    fn test_string_form_is_canonical_length() {
        let id = generate_monotonic_ulid_string();
        assert_eq!(id.len(), 26);
    }
}
