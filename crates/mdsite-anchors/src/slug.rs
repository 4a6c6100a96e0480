//! Slug derivation from heading text.

/// Derive an anchor-safe slug from heading text.
///
/// Normalization steps, in order: trim, spaces to underscores, lowercase,
/// collapse path-like separators (`/:`, `/`, `:`) into underscores, strip all
/// ASCII punctuation except underscores, then strip a single leading and
/// trailing underscore.
///
/// Pure function of its input; re-deriving from slug-safe text is a no-op.
///
/// # Examples
///
/// ```
/// use mdsite_anchors::derive_slug;
///
/// assert_eq!(derive_slug("Getting Started"), "getting_started");
/// assert_eq!(derive_slug("What's new?"), "whats_new");
/// ```
#[must_use]
pub fn derive_slug(text: &str) -> String {
    let mut slug = text.trim().replace(' ', "_").to_lowercase();
    slug = slug.replace("/:", ":").replace('/', ":").replace(':', "_");
    slug.retain(|c| !c.is_ascii_punctuation() || c == '_');

    let trimmed = slug.strip_prefix('_').unwrap_or(&slug);
    let trimmed = trimmed.strip_suffix('_').unwrap_or(trimmed);
    trimmed.to_owned()
}
