//! Block isolation: claiming custom-markup blocks before the markdown pass.

use crate::tabs::fence::CodeFence;

/// A pipeline stage that takes ownership of matching markdown blocks.
///
/// Isolators run between line preprocessing and the generic markdown pass.
/// A block that an isolator claims is replaced by its wrapped form — raw
/// HTML the converter carries through untouched — instead of being treated
/// as markdown.
pub trait BlockIsolator {
    /// Whether this isolator claims the block.
    fn test(&self, block: &str) -> bool;

    /// Produce the wrapped replacement for a claimed block.
    fn run(&self, block: &str) -> String;
}

/// Run isolators over every blank-line-delimited block of `text`.
///
/// Blocks are runs of consecutive non-blank lines; blank lines are passed
/// through unchanged so the document's block structure is preserved. The
/// first isolator whose [`test`](BlockIsolator::test) accepts a block wraps
/// it. Blocks overlapping a fenced code block are never offered to
/// isolators: fence content is literal text.
#[must_use]
pub fn isolate_blocks(text: &str, isolators: &[&dyn BlockIsolator]) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out_lines: Vec<String> = Vec::new();
    let mut fence = CodeFence::new();
    let mut at = 0;

    while at < lines.len() {
        if lines[at].trim().is_empty() {
            out_lines.push(lines[at].to_owned());
            at += 1;
            continue;
        }

        let start = at;
        let mut touches_fence = fence.active();
        while at < lines.len() && !lines[at].trim().is_empty() {
            fence.observe(lines[at]);
            touches_fence = touches_fence || fence.active();
            at += 1;
        }

        let block = lines[start..at].join("\n");
        let claimed = (!touches_fence)
            .then(|| isolators.iter().find(|iso| iso.test(&block)))
            .flatten();
        match claimed {
            Some(iso) => out_lines.push(iso.run(&block)),
            None => out_lines.push(block),
        }
    }

    out_lines.join("\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Wraps blocks equal to a fixed needle.
    struct Needle(&'static str);

    impl BlockIsolator for Needle {
        fn test(&self, block: &str) -> bool {
            block == self.0
        }

        fn run(&self, block: &str) -> String {
            format!("<claimed>{block}</claimed>")
        }
    }

    #[test]
    fn test_unmatched_text_unchanged() {
        let iso = Needle("nothing");
        let text = "para one\n\npara two";
        assert_eq!(isolate_blocks(text, &[&iso]), text);
    }

    #[test]
    fn test_matching_block_is_wrapped() {
        let iso = Needle("target");
        let text = "before\n\ntarget\n\nafter";
        assert_eq!(
            isolate_blocks(text, &[&iso]),
            "before\n\n<claimed>target</claimed>\n\nafter"
        );
    }

    #[test]
    fn test_multi_line_block() {
        let iso = Needle("a\nb");
        assert_eq!(isolate_blocks("a\nb", &[&iso]), "<claimed>a\nb</claimed>");
    }

    #[test]
    fn test_blank_lines_preserved_exactly() {
        let iso = Needle("x");
        let text = "one\n\n\n\ntwo";
        assert_eq!(isolate_blocks(text, &[&iso]), text);
    }

    #[test]
    fn test_first_matching_isolator_wins() {
        struct Always;
        impl BlockIsolator for Always {
            fn test(&self, _block: &str) -> bool {
                true
            }
            fn run(&self, block: &str) -> String {
                format!("<always>{block}</always>")
            }
        }

        let first = Needle("x");
        let second = Always;
        assert_eq!(
            isolate_blocks("x", &[&first as &dyn BlockIsolator, &second]),
            "<claimed>x</claimed>"
        );
    }

    #[test]
    fn test_fenced_blocks_not_offered() {
        let iso = Needle("target");
        let text = "```\ntarget\n```";
        assert_eq!(isolate_blocks(text, &[&iso]), text);
    }

    #[test]
    fn test_fence_with_internal_blank_lines_not_offered() {
        let iso = Needle("target");
        let text = "```\nfirst\n\ntarget\n\nlast\n```\n\ntarget";
        assert_eq!(
            isolate_blocks(text, &[&iso]),
            "```\nfirst\n\ntarget\n\nlast\n```\n\n<claimed>target</claimed>"
        );
    }
}
