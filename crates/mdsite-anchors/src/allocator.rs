//! Per-document slug allocator.

use crate::slug::derive_slug;

/// Ordered registry of issued slugs for one document.
///
/// Create one allocator per rendered document and discard it afterwards;
/// uniqueness is only meaningful within a single render. The registry keeps
/// insertion order because [`reclaim`](Self::reclaim) re-consumes entries by
/// position: the first recorded slug whose stem matches wins.
#[derive(Debug, Default)]
pub struct SlugAllocator {
    taken: Vec<String>,
}

impl SlugAllocator {
    /// Create an empty allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently recorded slugs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.taken.len()
    }

    /// Whether no slugs are currently recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }

    /// Issue a new unique slug for `text` and record it.
    ///
    /// The first candidate is the derived base with a trailing underscore
    /// (`base_`); collisions fall back to numbered forms (`base_2`, `base_3`,
    /// …) until a free one is found.
    pub fn issue(&mut self, text: &str) -> String {
        let base = derive_slug(text);
        let mut hook = format!("{base}_");
        let mut suffix = 2u32;
        while self.taken.iter().any(|t| t == &hook) {
            hook = format!("{base}_{suffix}");
            suffix += 1;
        }
        self.taken.push(hook.clone());
        hook
    }

    /// Reclaim the slug previously issued for `text`, removing it.
    ///
    /// Matching is by stem: the recorded slug's text before its final
    /// underscore-delimited suffix must equal the derived base. Calling
    /// reclaim in the same order as the original [`issue`](Self::issue) calls
    /// reproduces each slug exactly, including numbered duplicates.
    ///
    /// When nothing matches, the raw pattern (`base_`) is returned unresolved
    /// and the registry is left untouched. That silently mislabels the
    /// caller's element instead of failing; it only happens when the issue
    /// and reclaim passes saw different headings.
    pub fn reclaim(&mut self, text: &str) -> String {
        let pattern = format!("{}_", derive_slug(text));
        let stem = stem_of(&pattern);
        if let Some(at) = self.taken.iter().position(|t| stem_of(t) == stem) {
            return self.taken.remove(at);
        }
        pattern
    }
}

/// The slug text before its final underscore-delimited suffix.
fn stem_of(slug: &str) -> &str {
    match slug.rfind('_') {
        Some(at) => &slug[..at],
        None => slug,
    }
}
