//! Page rendering pipeline.

use mdsite_anchors::{AnchorEngine, Heading, render_sidenav};
use mdsite_config::Config;
use pulldown_cmark::{Options, Parser};

use crate::block::{BlockIsolator, isolate_blocks};
use crate::codefix::fix_code_blocks;
use crate::diagrams::SequenceDiagramIsolator;
use crate::tabs::{TabScaffoldIsolator, TabberPreprocessor, TabsPostprocessor};

/// Pipeline options, usually derived from a [`Config`].
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Enable GitHub Flavored Markdown features.
    pub gfm: bool,
    /// Expand `<tabber>` markup into togglable tabs.
    pub tabs: bool,
    /// Wrap sequence-diagram blocks for client-side rendering.
    pub diagrams: bool,
    /// Attach heading anchors and render the sidenav TOC.
    pub toc: bool,
    /// Deepest heading level listed in the sidenav (1–3).
    pub toc_max_level: u8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            tabs: true,
            diagrams: true,
            toc: true,
            toc_max_level: 3,
        }
    }
}

impl From<&Config> for RenderOptions {
    fn from(config: &Config) -> Self {
        Self {
            gfm: config.markdown.gfm,
            tabs: config.tabs.enabled,
            diagrams: config.diagrams.enabled,
            toc: config.toc.enabled,
            toc_max_level: config.toc.max_level,
        }
    }
}

/// Result of rendering one page.
#[derive(Clone, Debug)]
pub struct RenderedPage {
    /// Final page HTML.
    pub html: String,
    /// Rendered sidenav TOC fragment; empty when there are no headings.
    pub toc_html: String,
    /// Visible headings in document order (all levels 1–3).
    pub headings: Vec<Heading>,
    /// Text of the first level-1 heading, if any.
    pub title: Option<String>,
    /// Warnings generated during rendering.
    pub warnings: Vec<String>,
}

/// Renders markdown documents through the widget pipeline.
///
/// Stages run in fixed order: tabber preprocessing, block isolation, the
/// generic markdown pass, tabs post-processing, code block fixup, anchor
/// annotation, TOC rendering. Identifier registries (anchor slugs, tab
/// keys) are created fresh for every document; a renderer can therefore be
/// reused across pages and holds no per-page state.
#[derive(Clone, Debug, Default)]
pub struct PageRenderer {
    options: RenderOptions,
}

impl PageRenderer {
    /// Create a renderer with the given options.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Parser options for the generic markdown pass.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.options.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Render one markdown document to final page HTML.
    ///
    /// `page` identifies the document in logs; it takes no part in the
    /// transformation. A fragment that cannot be parsed for anchor
    /// generation degrades gracefully: the page renders without anchors and
    /// the failure is logged and reported in
    /// [`warnings`](RenderedPage::warnings).
    #[must_use]
    pub fn render_page(&self, markdown: &str, page: &str) -> RenderedPage {
        let mut warnings = Vec::new();

        // Stage 1: line preprocessing.
        let text = if self.options.tabs {
            let mut preprocessor = TabberPreprocessor::new();
            let processed = preprocessor.process(markdown);
            warnings.extend(preprocessor.warnings().iter().cloned());
            processed
        } else {
            markdown.to_owned()
        };

        // Stage 2: block isolation.
        let tab_isolator = TabScaffoldIsolator::new();
        let diagram_isolator = SequenceDiagramIsolator::new();
        let mut isolators: Vec<&dyn BlockIsolator> = Vec::new();
        if self.options.tabs {
            isolators.push(&tab_isolator);
        }
        if self.options.diagrams {
            isolators.push(&diagram_isolator);
        }
        let text = if isolators.is_empty() {
            text
        } else {
            isolate_blocks(&text, &isolators)
        };

        // Stage 3: generic markdown pass.
        let parser = Parser::new_ext(&text, self.parser_options());
        let mut html = String::with_capacity(text.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut html, parser);

        // Stage 4: HTML post-processing.
        if self.options.tabs {
            let mut postprocessor = TabsPostprocessor::new();
            html = postprocessor.rewrite(&html);
        }
        html = fix_code_blocks(&html);

        // Stage 5: anchors and TOC, with a fresh allocator per document.
        let (html, headings) = if self.options.toc {
            let mut engine = AnchorEngine::new();
            match engine.annotate(&html) {
                Ok(annotated) => (annotated.html, annotated.headings),
                Err(e) => {
                    tracing::warn!(
                        page = %page,
                        error = %e,
                        "Could not parse page for anchor generation, leaving content untouched"
                    );
                    warnings.push(format!("anchor generation skipped: {e}"));
                    (html, Vec::new())
                }
            }
        } else {
            (html, Vec::new())
        };

        let max_level = self.options.toc_max_level;
        let listed: Vec<Heading> = headings
            .iter()
            .filter(|h| h.level <= max_level)
            .cloned()
            .collect();
        let toc_html = render_sidenav(&listed);
        let title = headings
            .iter()
            .find(|h| h.level == 1)
            .map(|h| h.text.trim().to_owned());

        RenderedPage {
            html,
            toc_html,
            headings,
            title,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(markdown: &str) -> RenderedPage {
        PageRenderer::new(RenderOptions::default()).render_page(markdown, "test-page")
    }

    #[test]
    fn test_plain_markdown() {
        let page = render("Hello, world!");
        assert_eq!(page.html, "<p>Hello, world!</p>\n");
        assert_eq!(page.toc_html, "");
        assert!(page.headings.is_empty());
        assert!(page.title.is_none());
        assert!(page.warnings.is_empty());
    }

    #[test]
    fn test_headings_get_anchors_and_toc() {
        let page = render("# Intro\n\nBody text.\n\n## Usage\n");

        assert!(page.html.contains(r#"<h1 id="intro_">Intro</h1>"#));
        assert!(page.html.contains(r#"<h2 id="usage_">Usage</h2>"#));
        assert_eq!(page.headings.len(), 2);
        assert_eq!(page.title.as_deref(), Some("Intro"));
        assert!(page.toc_html.starts_with("<ul class='nav bs-docs-sidenav'>"));
        assert!(page.toc_html.contains("<li class='active'><a href='#intro_'"));
        assert!(page.toc_html.contains("<a href='#usage_'"));
    }

    #[test]
    fn test_duplicate_headings_numbered() {
        let page = render("## FAQ\n\n## FAQ\n");
        assert!(page.html.contains(r#"id="faq_""#));
        assert!(page.html.contains(r#"id="faq_2""#));
    }

    #[test]
    fn test_toc_max_level_limits_listing_not_anchors() {
        let renderer = PageRenderer::new(RenderOptions {
            toc_max_level: 1,
            ..RenderOptions::default()
        });
        let page = renderer.render_page("# Top\n\n## Nested\n", "test-page");

        assert!(page.html.contains(r#"<h2 id="nested_">"#));
        assert_eq!(page.headings.len(), 2);
        assert!(!page.toc_html.contains("nested_"));
    }

    #[test]
    fn test_tabber_round_trip() {
        let page = render("<tabber>Tab1=\nHello\n|-|Tab2=\nWorld\n</tabber>\n");

        assert!(page.html.contains("<ul class='nav nav-tabs'>"));
        assert!(page.html.contains(
            "<li class='active'><a href='#togglable_tabs_id_tab1' data-toggle='tab'>Tab1</a></li>"
        ));
        assert!(
            page.html
                .contains("<li><a href='#togglable_tabs_id_tab2' data-toggle='tab'>Tab2</a></li>")
        );
        assert!(page.html.contains("<div class='tab-content'>"));
        assert!(
            page.html
                .contains("<div class='tab-pane fade in active' id='togglable_tabs_id_tab1'>")
        );
        assert!(
            page.html
                .contains("<div class='tab-pane fade' id='togglable_tabs_id_tab2'>")
        );
        assert!(page.html.contains("<p>Hello</p>"));
        assert!(page.html.contains("<p>World</p>"));
        // No marker or wrapper leftovers.
        assert!(!page.html.contains("tabbed-nav"));
        assert!(!page.html.contains("{@"));
        assert!(!page.html.contains("@}"));
        assert!(page.warnings.is_empty());
    }

    #[test]
    fn test_tab_content_is_markdown_rendered() {
        let page = render("<tabber>Code=\n**bold** text\n</tabber>\n");
        assert!(page.html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_sequence_diagram_wrapped() {
        let page = render("Some intro.\n\nAlice->Bob: Hello\n\nSome outro.\n");

        assert!(page.html.contains(r#"<div class="sequence-diagram">"#));
        assert!(page.html.contains("Alice->Bob: Hello"));
        assert!(page.html.contains("<p>Some intro.</p>"));
        assert!(page.html.contains("<p>Some outro.</p>"));
    }

    #[test]
    fn test_non_diagram_block_untouched() {
        let page = render("Just a paragraph.\n");
        assert!(!page.html.contains("sequence-diagram"));
    }

    #[test]
    fn test_code_blocks_prettified() {
        let page = render("```rust\nfn main() {}\n```\n");
        assert!(page.html.contains("<pre class='prettyprint lang-rust'><code>"));
    }

    #[test]
    fn test_diagram_cue_inside_fence_not_wrapped() {
        let page = render("```\nAlice->Bob: Hello\n```\n");
        assert!(!page.html.contains("sequence-diagram"));
        assert!(page.html.contains("prettyprint"));
    }

    #[test]
    fn test_malformed_html_degrades_gracefully() {
        let page = render("before <b>unclosed\n\n# Heading\n");

        assert!(page.warnings.iter().any(|w| w.contains("anchor")));
        assert!(page.headings.is_empty());
        assert_eq!(page.toc_html, "");
        // Content is preserved without anchor ids.
        assert!(page.html.contains("<h1>Heading</h1>"));
    }

    #[test]
    fn test_tabs_disabled_leaves_markup() {
        let renderer = PageRenderer::new(RenderOptions {
            tabs: false,
            ..RenderOptions::default()
        });
        let page = renderer.render_page("<tabber>K=\nx\n</tabber>\n", "test-page");
        assert!(!page.html.contains("nav nav-tabs"));
    }

    #[test]
    fn test_diagrams_disabled() {
        let renderer = PageRenderer::new(RenderOptions {
            diagrams: false,
            ..RenderOptions::default()
        });
        let page = renderer.render_page("Alice->Bob: Hello\n", "test-page");
        assert!(!page.html.contains("sequence-diagram"));
    }

    #[test]
    fn test_toc_disabled() {
        let renderer = PageRenderer::new(RenderOptions {
            toc: false,
            ..RenderOptions::default()
        });
        let page = renderer.render_page("# Intro\n", "test-page");
        assert!(page.html.contains("<h1>Intro</h1>"));
        assert!(!page.html.contains("id="));
        assert_eq!(page.toc_html, "");
    }

    #[test]
    fn test_gfm_tables() {
        let page = render("| A | B |\n|---|---|\n| 1 | 2 |\n");
        assert!(page.html.contains("<table>"));

        let renderer = PageRenderer::new(RenderOptions {
            gfm: false,
            ..RenderOptions::default()
        });
        let page = renderer.render_page("| A | B |\n|---|---|\n| 1 | 2 |\n", "test-page");
        assert!(!page.html.contains("<table>"));
    }

    #[test]
    fn test_options_from_config() {
        let config = Config::default();
        let options = RenderOptions::from(&config);
        assert!(options.gfm);
        assert!(options.tabs);
        assert!(options.diagrams);
        assert!(options.toc);
        assert_eq!(options.toc_max_level, 3);
    }

    #[test]
    fn test_renderer_reusable_across_pages() {
        let renderer = PageRenderer::new(RenderOptions::default());
        let first = renderer.render_page("# Intro\n", "page-one");
        let second = renderer.render_page("# Intro\n", "page-two");

        // Slug state is per document, so identical pages get identical slugs.
        assert_eq!(first.headings[0].hook, "intro_");
        assert_eq!(second.headings[0].hook, "intro_");
    }
}
