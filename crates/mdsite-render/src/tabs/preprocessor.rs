//! Tabber preprocessor converting wikitext tab markup to marker sections.

use std::collections::VecDeque;

use super::fence::CodeFence;

/// Opening marker of a tab block.
const OPEN_MARKER: &str = "<tabber>";
/// Closing marker of a tab block.
const CLOSE_MARKER: &str = "</tabber>";
/// Separator between `KEY=VALUE` segments inside a tab block.
const KEY_SEPARATOR: &str = "|-|";

/// Preprocessor that rewrites `<tabber>` blocks into marker sections.
///
/// A tab block carries `KEY=VALUE` segments separated by `|-|`:
///
/// ```text
/// <tabber>macOS=
/// Install with Homebrew.
/// |-|Linux=
/// Install with apt.
/// </tabber>
/// ```
///
/// The rewrite emits two synthetic sections built from bracket markers that
/// survive the generic markdown pass: a key-declaration section listing the
/// tab labels (`{@` / `{@$[KEY]}` / `{@[KEY]}` / `@}`) and a content section
/// holding each tab's lines (`{{@` / `{{@$[KEY]` / `/@}}` / `@}}`). The
/// first key of a block is the active tab, flagged with `$`. Blank lines are
/// placed so the marker scaffolding and the tab contents end up in separate
/// markdown blocks.
///
/// Markers occurring mid-line split the line so a marker always starts a
/// line; markers inside fenced code blocks are left alone.
///
/// # Example
///
/// ```
/// use mdsite_render::TabberPreprocessor;
///
/// let mut preprocessor = TabberPreprocessor::new();
/// let output = preprocessor.process("<tabber>One=\nFirst tab.\n|-|Two=\nSecond tab.\n</tabber>");
///
/// assert!(output.contains("{@$[One]}"));
/// assert!(output.contains("{@[Two]}"));
/// assert!(output.contains("First tab."));
/// assert!(preprocessor.warnings().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct TabberPreprocessor {
    warnings: Vec<String>,
}

impl TabberPreprocessor {
    /// Create a new preprocessor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Warnings generated during processing.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Process markdown text and return the transformed output.
    #[must_use]
    pub fn process(&mut self, input: &str) -> String {
        let mut queue: VecDeque<String> = input.lines().map(str::to_owned).collect();
        let mut out_lines: Vec<String> = Vec::new();
        let mut block: Option<Vec<String>> = None;
        let mut fence = CodeFence::new();

        while let Some(line) = queue.pop_front() {
            let trimmed = line.trim();

            if !fence.active() {
                // Split lines with a marker mid-line so markers always start
                // a line. The closing marker is checked first.
                if let Some(split) = split_at_marker(&line, trimmed, CLOSE_MARKER)
                    .or_else(|| split_at_marker(&line, trimmed, OPEN_MARKER))
                {
                    let (before, after) = split;
                    queue.push_front(after);
                    queue.push_front(before);
                    continue;
                }
            }

            fence.observe(&line);

            let mut closing = false;
            match block.as_mut() {
                Some(lines) => {
                    closing = !fence.active() && trimmed.starts_with(CLOSE_MARKER);
                    lines.push(line);
                }
                None => {
                    if !fence.active() && trimmed.starts_with(OPEN_MARKER) {
                        block = Some(vec![line]);
                    } else {
                        out_lines.push(line);
                    }
                }
            }
            if closing {
                if let Some(lines) = block.take() {
                    self.expand(&lines, &mut out_lines);
                }
            }
        }

        if let Some(lines) = block.take() {
            self.warnings
                .push("unclosed <tabber> block, emitting content verbatim".to_owned());
            out_lines.extend(lines);
        }

        let mut output = out_lines.join("\n");
        if input.ends_with('\n') {
            output.push('\n');
        }
        output
    }

    /// Expand one captured tab block into marker-section lines.
    fn expand(&mut self, lines: &[String], out: &mut Vec<String>) {
        let body = lines
            .join("\n")
            .replace(OPEN_MARKER, "")
            .replace(CLOSE_MARKER, "");

        let mut keys: Vec<String> = Vec::new();
        let mut values: Vec<String> = Vec::new();
        for segment in body.split(KEY_SEPARATOR) {
            if let Some(at) = segment.find('=') {
                keys.push(segment[..at].trim().to_owned());
                values.push(segment[at + 1..].to_owned());
            } else if !segment.trim().is_empty() {
                let key = segment.trim().to_owned();
                self.warnings
                    .push(format!("tab segment '{key}' has no '=', content is empty"));
                keys.push(key);
                values.push(String::new());
            }
        }

        if keys.is_empty() {
            self.warnings
                .push("<tabber> block declares no tabs, skipping".to_owned());
            return;
        }

        // Key-declaration section. The leading blank line makes `{@` start a
        // fresh markdown block.
        out.push(String::new());
        out.push("{@".to_owned());
        for (at, key) in keys.iter().enumerate() {
            if at == 0 {
                out.push(format!("{{@$[{key}]}}"));
            } else {
                out.push(format!("{{@[{key}]}}"));
            }
        }
        out.push("@}".to_owned());

        // Content section. Each declaration header is followed by a blank
        // line and each pane close is preceded by one, so the tab contents
        // become ordinary markdown blocks while the scaffolding around them
        // stays fused into recognizable marker blocks.
        out.push("{{@".to_owned());
        for (at, (key, value)) in keys.iter().zip(&values).enumerate() {
            if at == 0 {
                out.push(format!("{{{{@$[{key}]"));
            } else {
                out.push(format!("{{{{@[{key}]"));
            }
            out.push(String::new());
            for content_line in value.split('\n') {
                out.push(content_line.to_owned());
            }
            out.push(String::new());
            out.push("/@}}".to_owned());
        }
        out.push("@}}".to_owned());
        out.push(String::new());
    }
}

/// Split `line` in two when `marker` occurs mid-line rather than at the
/// start. Returns `None` when no split is needed.
fn split_at_marker(line: &str, trimmed: &str, marker: &str) -> Option<(String, String)> {
    if trimmed.starts_with(marker) {
        return None;
    }
    let at = line.find(marker)?;
    Some((line[..at].to_owned(), line[at..].to_owned()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        let mut pre = TabberPreprocessor::new();
        let input = "# Heading\n\nSome paragraph.\n";
        assert_eq!(pre.process(input), input);
        assert!(pre.warnings().is_empty());
    }

    #[test]
    fn test_two_tab_block() {
        let mut pre = TabberPreprocessor::new();
        let output = pre.process("<tabber>Tab1=\nHello\n|-|Tab2=\nWorld\n</tabber>");

        let expected = "\n\
                        {@\n\
                        {@$[Tab1]}\n\
                        {@[Tab2]}\n\
                        @}\n\
                        {{@\n\
                        {{@$[Tab1]\n\
                        \n\
                        \n\
                        Hello\n\
                        \n\
                        \n\
                        /@}}\n\
                        {{@[Tab2]\n\
                        \n\
                        \n\
                        World\n\
                        \n\
                        \n\
                        /@}}\n\
                        @}}\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_first_key_is_active() {
        let mut pre = TabberPreprocessor::new();
        let output = pre.process("<tabber>A=\none\n|-|B=\ntwo\n|-|C=\nthree\n</tabber>");

        assert!(output.contains("{@$[A]}"));
        assert!(output.contains("{@[B]}"));
        assert!(output.contains("{@[C]}"));
        assert!(output.contains("{{@$[A]"));
        assert!(output.contains("{{@[B]"));
        assert_eq!(output.matches('$').count(), 2);
    }

    #[test]
    fn test_mid_line_markers_are_split() {
        let mut pre = TabberPreprocessor::new();
        let output = pre.process("Intro text.<tabber>K=\nbody\n</tabber>Outro.");

        assert!(output.contains("Intro text."));
        assert!(output.contains("Outro."));
        assert!(output.contains("{@$[K]}"));
    }

    #[test]
    fn test_close_marker_mid_line() {
        let mut pre = TabberPreprocessor::new();
        let output = pre.process("<tabber>K=\nbody</tabber>\nafter");

        assert!(output.contains("{@$[K]}"));
        assert!(output.contains("body"));
        assert!(output.ends_with("after"));
    }

    #[test]
    fn test_blank_lines_in_content_preserved() {
        let mut pre = TabberPreprocessor::new();
        let output = pre.process("<tabber>K=\nfirst\n\nsecond\n</tabber>");

        assert!(output.contains("first\n\nsecond") || output.contains("first\n\n\nsecond"));
    }

    #[test]
    fn test_marker_inside_code_fence_ignored() {
        let mut pre = TabberPreprocessor::new();
        let input = "```\n<tabber>K=\nnot markup\n</tabber>\n```\n";
        let output = pre.process(input);

        assert_eq!(output, input);
    }

    #[test]
    fn test_unclosed_block_warns_and_keeps_content() {
        let mut pre = TabberPreprocessor::new();
        let output = pre.process("<tabber>K=\norphan line");

        assert!(pre.warnings().iter().any(|w| w.contains("unclosed")));
        assert!(output.contains("orphan line"));
        assert!(!output.contains("{@$["));
    }

    #[test]
    fn test_empty_block_warns() {
        let mut pre = TabberPreprocessor::new();
        let output = pre.process("<tabber>\n</tabber>");

        assert!(pre.warnings().iter().any(|w| w.contains("no tabs")));
        assert!(!output.contains("{@"));
    }

    #[test]
    fn test_segment_without_equals_warns() {
        let mut pre = TabberPreprocessor::new();
        let output = pre.process("<tabber>Good=\ncontent\n|-|Bad\n</tabber>");

        assert!(pre.warnings().iter().any(|w| w.contains("no '='")));
        assert!(output.contains("{@[Bad]}"));
    }

    #[test]
    fn test_multiple_blocks() {
        let mut pre = TabberPreprocessor::new();
        let output = pre.process(
            "<tabber>A=\none\n</tabber>\n\nBetween.\n\n<tabber>B=\ntwo\n</tabber>",
        );

        assert!(output.contains("{@$[A]}"));
        assert!(output.contains("{@$[B]}"));
        assert!(output.contains("Between."));
    }

    #[test]
    fn test_preserves_trailing_newline() {
        let mut pre = TabberPreprocessor::new();
        assert_eq!(pre.process("line\n"), "line\n");
        assert_eq!(pre.process("line"), "line");
    }
}
