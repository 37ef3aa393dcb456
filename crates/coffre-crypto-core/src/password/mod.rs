//! Cryptographic password generation.
//!
//! Three complexity tiers, selectable by the caller:
//! - [`Complexity::Simple`] — capitalized wordlist words + a 3-digit number
//! - [`Complexity::Moderate`] — one guaranteed character per class over a
//!   restricted symbol set, then shuffled
//! - [`Complexity::Complex`] — uniform draws from the full alphabet (default)
//!
//! All randomness comes from `OsRng` (OS-level CSPRNG) — generated strings
//! are used as real secrets.

pub mod wordlist;

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::CryptoError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default generated password length.
pub const DEFAULT_PASSWORD_LENGTH: usize = 16;

// Character sets
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";

/// Restricted symbol set for moderate passwords.
const MODERATE_SYMBOLS: &[u8] = b"!@#$%";

/// Full ASCII punctuation set for complex passwords.
const PUNCTUATION: &[u8] = br##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Generation complexity tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Complexity {
    /// Word-based, human-memorable, lower entropy.
    Simple,
    /// Guaranteed character classes over a restricted symbol set.
    Moderate,
    /// Uniform draws from the full alphabet.
    #[default]
    Complex,
}

impl Complexity {
    /// Parse a numeric complexity level (1 = simple, 2 = moderate,
    /// 3 = complex).
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::PasswordGeneration`] for any other level.
    pub fn from_level(level: u8) -> Result<Self, CryptoError> {
        match level {
            1 => Ok(Self::Simple),
            2 => Ok(Self::Moderate),
            3 => Ok(Self::Complex),
            other => Err(CryptoError::PasswordGeneration(format!(
                "complexity level must be 1, 2, or 3, got {other}"
            ))),
        }
    }

    /// The numeric level of this tier.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Simple => 1,
            Self::Moderate => 2,
            Self::Complex => 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Generate a random password of at most `length` characters.
///
/// Only [`Complexity::Simple`] may return fewer than `length` characters
/// (its word+number concatenation is never padded); the other tiers return
/// exactly `length`.
///
/// # Errors
///
/// Returns [`CryptoError::PasswordGeneration`] if `length` is zero —
/// rejected before any randomness is drawn.
pub fn generate(length: usize, complexity: Complexity) -> Result<String, CryptoError> {
    if length == 0 {
        return Err(CryptoError::PasswordGeneration(
            "length must be at least 1".into(),
        ));
    }

    Ok(match complexity {
        Complexity::Simple => generate_simple(length),
        Complexity::Moderate => generate_moderate(length),
        Complexity::Complex => generate_complex(length),
    })
}

// ---------------------------------------------------------------------------
// Tier implementations
// ---------------------------------------------------------------------------

/// Simple: 1–3 capitalized wordlist words, a 3-digit number, truncated.
fn generate_simple(length: usize) -> String {
    let words = wordlist::common();
    let mut rng = OsRng;

    let word_count = (length / 4).clamp(1, 3);

    let mut password = String::new();
    for _ in 0..word_count {
        let word = words[rng.gen_range(0..words.len())];
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            password.extend(first.to_uppercase());
            password.push_str(chars.as_str());
        }
    }

    // 3-digit suffix, then cut to the requested length. Never padded:
    // a short word draw simply yields a shorter password.
    password.push_str(&rng.gen_range(100..1000_u16).to_string());
    password.truncate(length);
    password
}

/// Moderate: one guaranteed character from each class, remainder from the
/// combined alphabet, Fisher-Yates shuffled so guaranteed characters are
/// not always in fixed positions.
///
/// Below length 4 the guaranteed list already exceeds the request: the four
/// class characters are generated, shuffled, and truncated to `length`, so
/// the output is always exactly `length` characters but the one-per-class
/// guarantee is void.
fn generate_moderate(length: usize) -> String {
    let mut rng = OsRng;

    let mut chars: Vec<u8> = vec![
        UPPERCASE[rng.gen_range(0..UPPERCASE.len())],
        LOWERCASE[rng.gen_range(0..LOWERCASE.len())],
        DIGITS[rng.gen_range(0..DIGITS.len())],
        MODERATE_SYMBOLS[rng.gen_range(0..MODERATE_SYMBOLS.len())],
    ];

    let mut pool: Vec<u8> = Vec::new();
    pool.extend_from_slice(UPPERCASE);
    pool.extend_from_slice(LOWERCASE);
    pool.extend_from_slice(DIGITS);
    pool.extend_from_slice(MODERATE_SYMBOLS);

    for _ in chars.len()..length {
        chars.push(pool[rng.gen_range(0..pool.len())]);
    }

    chars.shuffle(&mut rng);
    chars.truncate(length);

    // Safety: all chars are ASCII.
    String::from_utf8(chars).expect("password chars are ASCII")
}

/// Complex: `length` independent uniform draws from the full alphabet,
/// no placement guarantees.
fn generate_complex(length: usize) -> String {
    let mut rng = OsRng;

    let mut pool: Vec<u8> = Vec::new();
    pool.extend_from_slice(UPPERCASE);
    pool.extend_from_slice(LOWERCASE);
    pool.extend_from_slice(DIGITS);
    pool.extend_from_slice(PUNCTUATION);

    let chars: Vec<u8> = (0..length)
        .map(|_| pool[rng.gen_range(0..pool.len())])
        .collect();

    // Safety: all chars are ASCII.
    String::from_utf8(chars).expect("password chars are ASCII")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
