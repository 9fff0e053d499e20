//! Short identifier generation.
//!
//! Identifiers are drawn character by character, uniformly and independently,
//! from an alphabet. Nothing here guarantees uniqueness; the store rejects
//! duplicates and the shortening service draws again.

use rand::Rng;

/// Default alphabet: lowercase, uppercase and digits (62 characters).
pub const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Identifiers that would be shadowed by fixed routes.
const RESERVED_CODES: &[&str] = &["health", "short", "decode"];

/// Generates a random identifier of `length` characters from [`ALPHANUMERIC`].
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> String {
    generate_code_from(length, ALPHANUMERIC, &mut rand::rng())
}

/// Generates a random identifier of `length` characters from `alphabet`
/// using the given random source.
///
/// # Panics
///
/// Panics if `alphabet` is empty and `length` is non-zero.
pub fn generate_code_from<R: Rng + ?Sized>(length: usize, alphabet: &[u8], rng: &mut R) -> String {
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..alphabet.len());
            alphabet[idx] as char
        })
        .collect()
}

/// Returns true if `code` must never be handed out as a short identifier.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}
