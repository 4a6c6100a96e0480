//! Sequence-diagram block isolation.

use std::sync::LazyLock;

use regex::Regex;

use crate::block::BlockIsolator;

/// CSS class of the wrapper element the client-side renderer looks for.
const DIAGRAM_CLASS: &str = "sequence-diagram";

/// `title: Payment flow`
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*title\s*:").unwrap());

/// `participant Alice`
static PARTICIPANT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*participant\s+\S").unwrap());

/// `note left of Alice: thinking` (also `right of`, `over`)
static NOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*note\s+(left of|right of|over)\s").unwrap());

/// `Alice->Bob: Hello` (also `-->`, `->>`, `-->>`)
static MESSAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\S+\s*--?>>?\s*\S+\s*:").unwrap());

/// Isolates sequence-diagram blocks from the generic markdown pass.
///
/// A block qualifies when any of its lines carries a diagram-syntax cue: a
/// title declaration, a participant declaration, a note declaration, or an
/// arrow-style message. Qualifying blocks are wrapped verbatim in a
/// `<div class="sequence-diagram">` container — the diagram source is
/// rendered client-side, so no internal transformation happens here.
#[derive(Debug, Default)]
pub struct SequenceDiagramIsolator;

impl SequenceDiagramIsolator {
    /// Create a new isolator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl BlockIsolator for SequenceDiagramIsolator {
    fn test(&self, block: &str) -> bool {
        TITLE_RE.is_match(block)
            || PARTICIPANT_RE.is_match(block)
            || NOTE_RE.is_match(block)
            || MESSAGE_RE.is_match(block)
    }

    fn run(&self, block: &str) -> String {
        format!("<div class=\"{DIAGRAM_CLASS}\">\n{block}\n</div>")
    }
}
