//! Tabs post-processor expanding marker sections into Bootstrap HTML.

use std::sync::LazyLock;

use mdsite_anchors::escape_html;
use regex::Regex;

use super::scaffold::{WRAPPER_CLOSE, WRAPPER_OPEN};

/// Key declaration inside the key section: `{@[KEY]}` or `{@$[KEY]}`.
static KEY_DECL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{@(\$)?\[(.*)\]\}$").unwrap());

/// Content declaration header: `{{@[KEY]` or `{{@$[KEY]`.
static CONTENT_DECL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{\{@(\$)?\[(.*)\]$").unwrap());

/// Identifier prefix shared by tab links and panes.
const ID_PREFIX: &str = "togglable_tabs_id_";

/// Registry of tab-pane identifiers for one document.
///
/// Key declarations [`produce`](Self::produce) identifiers in order; content
/// declarations [`consume`](Self::consume) them in the same order, so a
/// link and its pane end up sharing one identifier even when labels repeat.
#[derive(Debug, Default)]
pub struct KeyRegistry {
    taken: Vec<String>,
}

impl KeyRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce a unique identifier for a tab label and record it.
    ///
    /// The label is normalized (trimmed, spaces to underscores, lowercased);
    /// collisions are resolved by prefixing underscores until free.
    pub fn produce(&mut self, label: &str) -> String {
        let mut id = normalize(label);
        while self.taken.iter().any(|t| t == &id) {
            id.insert(0, '_');
        }
        self.taken.push(id.clone());
        id
    }

    /// Consume the identifier previously produced for a tab label.
    ///
    /// Matching is underscore-insensitive so the collision-prefixed forms
    /// still pair up; the first recorded match is removed and returned. An
    /// unmatched label silently yields its normalized form and leaves the
    /// registry untouched.
    pub fn consume(&mut self, label: &str) -> String {
        let id = normalize(label);
        let stripped = strip_underscores(&id);
        if let Some(at) = self
            .taken
            .iter()
            .position(|t| strip_underscores(t) == stripped)
        {
            return self.taken.remove(at);
        }
        id
    }
}

fn normalize(label: &str) -> String {
    label.trim().replace(' ', "_").to_lowercase()
}

fn strip_underscores(id: &str) -> String {
    id.chars().filter(|&c| c != '_').collect()
}

/// One recognized marker line in the rendered HTML.
#[derive(Debug, PartialEq, Eq)]
enum Marker<'a> {
    /// `<tabbed-nav>` / `</tabbed-nav>` wrapper line, dropped from output.
    Wrapper,
    /// `{@` — opens the nav list.
    GroupOpen,
    /// `@}` — closes the nav list.
    GroupClose,
    /// `{@[KEY]}` or `{@$[KEY]}`.
    KeyDecl { key: &'a str, active: bool },
    /// `{{@` — opens the pane container.
    ContentOpen,
    /// `{{@[KEY]` or `{{@$[KEY]`.
    ContentDecl { key: &'a str, active: bool },
    /// `/@}}` — closes a pane.
    PaneClose,
    /// `@}}` — closes the pane container.
    ContentClose,
}

/// Classify a line of rendered HTML as a tab marker, if it is one.
fn classify(line: &str) -> Option<Marker<'_>> {
    let trimmed = line.trim();
    match trimmed {
        WRAPPER_OPEN | WRAPPER_CLOSE => Some(Marker::Wrapper),
        "{@" => Some(Marker::GroupOpen),
        "@}" => Some(Marker::GroupClose),
        "{{@" => Some(Marker::ContentOpen),
        "/@}}" => Some(Marker::PaneClose),
        "@}}" => Some(Marker::ContentClose),
        _ => {
            if let Some(caps) = KEY_DECL_RE.captures(trimmed) {
                return Some(Marker::KeyDecl {
                    key: caps.get(2).map_or("", |m| m.as_str()),
                    active: caps.get(1).is_some(),
                });
            }
            if let Some(caps) = CONTENT_DECL_RE.captures(trimmed) {
                return Some(Marker::ContentDecl {
                    key: caps.get(2).map_or("", |m| m.as_str()),
                    active: caps.get(1).is_some(),
                });
            }
            None
        }
    }
}

/// Post-processor turning marker sections into Bootstrap nav/tab-pane HTML.
///
/// Runs on the output of the markdown pass, where the scaffolding survives
/// as raw lines inside `<tabbed-nav>` wrappers. Each line is classified as
/// a marker kind and replaced; unrecognized lines (the rendered tab
/// contents among them) pass through untouched. Create one post-processor
/// per document: identifier uniqueness is scoped to its [`KeyRegistry`].
#[derive(Debug, Default)]
pub struct TabsPostprocessor {
    registry: KeyRegistry,
}

impl TabsPostprocessor {
    /// Create a post-processor with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand all marker lines in `html`.
    #[must_use]
    pub fn rewrite(&mut self, html: &str) -> String {
        let mut out_lines: Vec<String> = Vec::new();
        for line in html.lines() {
            match classify(line) {
                Some(Marker::Wrapper) => {}
                Some(Marker::GroupOpen) => out_lines.push("<ul class='nav nav-tabs'>".to_owned()),
                Some(Marker::GroupClose) => out_lines.push("</ul>".to_owned()),
                Some(Marker::KeyDecl { key, active }) => {
                    let id = self.registry.produce(key);
                    let class = if active { " class='active'" } else { "" };
                    out_lines.push(format!(
                        "\t<li{class}><a href='#{ID_PREFIX}{id}' data-toggle='tab'>{}</a></li>",
                        escape_html(key)
                    ));
                }
                Some(Marker::ContentOpen) => {
                    out_lines.push("<div class='tab-content'>".to_owned());
                }
                Some(Marker::ContentDecl { key, active }) => {
                    let id = self.registry.consume(key);
                    let class = if active {
                        "tab-pane fade in active"
                    } else {
                        "tab-pane fade"
                    };
                    out_lines.push(format!("\t<div class='{class}' id='{ID_PREFIX}{id}'>"));
                }
                Some(Marker::PaneClose) => out_lines.push("\t</div>".to_owned()),
                Some(Marker::ContentClose) => out_lines.push("</div>".to_owned()),
                None => out_lines.push(line.to_owned()),
            }
        }

        let mut out = out_lines.join("\n");
        if html.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}
