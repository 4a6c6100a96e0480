//! Block isolator for tab marker scaffolding.

use crate::block::BlockIsolator;

/// Wrapper element protecting marker scaffolding through the markdown pass.
///
/// A hyphenated custom element name, so the converter recognizes the block
/// as raw HTML and carries it through verbatim.
pub(crate) const WRAPPER_OPEN: &str = "<tabbed-nav>";
pub(crate) const WRAPPER_CLOSE: &str = "</tabbed-nav>";

/// Isolates tab marker scaffolding from the generic markdown pass.
///
/// The [`TabberPreprocessor`](super::TabberPreprocessor) places blank lines
/// so the marker scaffolding fuses into three recognizable block shapes: the
/// key-declaration block (ending in the first content header), the
/// pane-close/next-header block, and the final pane-close/section-close
/// block. Each is wrapped in a `<tabbed-nav>` element so the markdown pass
/// neither escapes the markers nor wraps them in paragraph tags; everything
/// between the scaffolding blocks is ordinary markdown.
#[derive(Debug, Default)]
pub struct TabScaffoldIsolator;

impl TabScaffoldIsolator {
    /// Create a new isolator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl BlockIsolator for TabScaffoldIsolator {
    fn test(&self, block: &str) -> bool {
        let bracketed_start = (block.starts_with("{@\n{@[") || block.starts_with("{@\n{@$["))
            && block.ends_with(']');
        let pane_boundary = (block.starts_with("/@}}\n{{@[") || block.starts_with("/@}}\n{{@$["))
            && block.ends_with(']');
        let closing = block.starts_with("/@}}\n@}}");

        bracketed_start || pane_boundary || closing
    }

    fn run(&self, block: &str) -> String {
        format!("{WRAPPER_OPEN}\n{block}\n{WRAPPER_CLOSE}")
    }
}
