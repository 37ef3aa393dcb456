//! Embedded wordlist for simple (word-based) password generation.
//!
//! Every entry is 4–8 lowercase ASCII characters so capitalized
//! concatenations stay predictable in length.

/// Common-noun wordlist, 4–8 characters per word.
const COMMON: &[&str] = &[
    "bird", "fish", "lion", "bear", "wolf", "deer", "book", "desk", "lamp", "tree", "moon",
    "star", "cloud", "chair", "bicycle", "door", "window", "broom", "river", "stone", "maple",
    "cedar", "field", "grain", "house", "candle", "garden", "marble", "copper", "silver",
    "autumn", "winter", "spring", "summer", "meadow", "harbor", "anchor", "basket", "bottle",
    "branch", "bridge", "butter", "camera", "carpet", "castle", "cellar", "circle", "corner",
    "cotton", "crystal", "curtain", "engine", "feather", "hammer", "island", "jacket", "kettle",
    "ladder", "lantern", "mirror", "needle", "orchard", "pebble", "pillow", "ribbon", "saddle",
    "shadow", "thimble", "valley", "whistle",
];

/// Returns the embedded wordlist.
#[must_use]
pub(crate) const fn common() -> &'static [&'static str] {
    COMMON
}
