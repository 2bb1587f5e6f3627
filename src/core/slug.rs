//! Slug normalization for primary-key codes
//!
//! Company and industry codes are slugs derived from free-text labels. The
//! caller-supplied code is never stored verbatim: it always passes through
//! [`Slugifier::slugify`] first.

/// Utility for deriving URL-safe primary-key slugs from human-readable labels
pub struct Slugifier;

impl Slugifier {
    /// Normalize a free-text label to a lowercase, separator-free slug.
    ///
    /// Keeps ASCII letters and digits, lowercased; everything else
    /// (whitespace, punctuation, non-ASCII) is stripped. A label with no
    /// usable characters normalizes to the empty string.
    ///
    /// # Examples
    ///
    /// ```
    /// use tally::core::slug::Slugifier;
    ///
    /// assert_eq!(Slugifier::slugify("Acme Corp!"), "acmecorp");
    /// assert_eq!(Slugifier::slugify("ibm"), "ibm");
    /// assert_eq!(Slugifier::slugify("Fast-Track 9"), "fasttrack9");
    /// ```
    pub fn slugify(label: &str) -> String {
        label
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect()
    }
}
