//! Heuristic password strength scoring.
//!
//! An explainable, feedback-producing scorer — deliberately not an entropy
//! estimate. The rules run in a fixed order (short-circuit, cumulative
//! points, deficiency cap, clamp, label mapping) because the final label is
//! sensitive to that precedence.

use serde::Serialize;
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Passwords shorter than this short-circuit to [`StrengthLabel::TooShort`].
const MIN_LENGTH: usize = 8;

/// Highest reachable score when digits or punctuation are absent.
const MISSING_CLASS_CAP: i32 = 4;

/// Known weak substrings: common words, keyboard walks, digit runs,
/// repeated symbols. Matched case-insensitively anywhere in the password.
const WEAK_PATTERNS: &[&str] = &[
    "password", "qwerty", "letmein", "admin", "welcome", "monkey", "dragon", "123", "321", "abc",
    "asdf", "zxcv", "aaa", "111", "000", "!!!", "$$$",
];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Strength tier. Ordered weakest to strongest so callers can compare
/// (`label >= StrengthLabel::Strong`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLabel {
    /// Short-circuit outcome for passwords under 8 characters.
    TooShort,
    VeryWeak,
    Weak,
    Fair,
    Moderate,
    Good,
    Strong,
    VeryStrong,
    Excellent,
}

impl StrengthLabel {
    /// Human-readable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TooShort => "Very Weak - Too Short",
            Self::VeryWeak => "Very Weak",
            Self::Weak => "Weak",
            Self::Fair => "Fair",
            Self::Moderate => "Moderate",
            Self::Good => "Good",
            Self::Strong => "Strong",
            Self::VeryStrong => "Very Strong",
            Self::Excellent => "Excellent",
        }
    }

    /// Map a clamped [0, 7] score to its label.
    const fn from_score(score: i32) -> Self {
        match score {
            i32::MIN..=0 => Self::VeryWeak,
            1 => Self::Weak,
            2 => Self::Fair,
            3 => Self::Moderate,
            4 => Self::Good,
            5 => Self::Strong,
            6 => Self::VeryStrong,
            _ => Self::Excellent,
        }
    }
}

/// Result of scoring: the label plus the notes collected along the way.
#[derive(Debug, Clone, Serialize)]
pub struct StrengthReport {
    /// Final strength tier.
    pub label: StrengthLabel,
    /// Descriptive and corrective notes, in rule order.
    pub feedback: Vec<String>,
}

impl StrengthReport {
    /// Join the label and feedback into one human-readable line.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.feedback.is_empty() {
            self.label.as_str().to_owned()
        } else {
            format!("{} ({})", self.label.as_str(), self.feedback.join("; "))
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Score a password.
///
/// Rule order is normative:
/// 1. length < 8 short-circuits to `Very Weak - Too Short`
/// 2. length tiers at 10 / 12 / 16 add one point each
/// 3. character classes add points; missing digits or punctuation caps the
///    final score at 4 with a corrective note
/// 4. variety ratio (distinct / total) below 0.5 subtracts two points and
///    flags repetition; at 0.75 or above adds one
/// 5. each matched weak pattern subtracts two points
/// 6. the cap is applied, the result clamped to [0, 7] and mapped to a label
#[must_use]
#[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
pub fn score(password: &str) -> StrengthReport {
    let length = password.chars().count();

    if length < MIN_LENGTH {
        return StrengthReport {
            label: StrengthLabel::TooShort,
            feedback: Vec::new(),
        };
    }

    let mut score: i32 = 0;
    let mut cap: i32 = 7;
    let mut feedback: Vec<String> = Vec::new();

    // Length tiers.
    if length >= 10 {
        score += 1;
        feedback.push("good length".into());
    }
    if length >= 12 {
        score += 1;
        feedback.push("strong length".into());
    }
    if length >= 16 {
        score += 1;
        feedback.push("excellent length".into());
    }

    // Character classes.
    let lower = password.chars().filter(char::is_ascii_lowercase).count();
    let upper = password.chars().filter(char::is_ascii_uppercase).count();
    let digits = password.chars().filter(char::is_ascii_digit).count();
    let punct = password
        .chars()
        .filter(char::is_ascii_punctuation)
        .count();

    if lower >= 1 {
        score += 1;
    }
    if upper >= 1 {
        score += 1;
    }

    if digits >= 1 {
        score += 1;
    }
    if digits >= 3 {
        score += 1;
    }
    if digits == 0 {
        cap = cap.min(MISSING_CLASS_CAP);
        feedback.push("add digits to strengthen".into());
    }

    if punct >= 1 {
        score += 1;
    }
    if punct >= 2 {
        score += 1;
    }
    if punct == 0 {
        cap = cap.min(MISSING_CLASS_CAP);
        feedback.push("add symbols to strengthen".into());
    }

    // Character variety.
    let distinct: HashSet<char> = password.chars().collect();
    let ratio = distinct.len() as f64 / length as f64;
    if ratio < 0.5 {
        score -= 2;
        feedback.push("too many repeated characters".into());
    } else if ratio >= 0.75 {
        score += 1;
    }

    // Known weak patterns.
    let lowered = password.to_lowercase();
    for pattern in WEAK_PATTERNS {
        if lowered.contains(pattern) {
            score -= 2;
            feedback.push(format!("contains a common pattern: \"{pattern}\""));
        }
    }

    let final_score = score.min(cap).clamp(0, 7);

    StrengthReport {
        label: StrengthLabel::from_score(final_score),
        feedback,
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
