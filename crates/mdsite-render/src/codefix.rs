//! Code block fixup for the Bootstrap theme's prettifier.

use std::sync::LazyLock;

use regex::Regex;

/// `<pre><code class="language-rust">` as emitted by the markdown pass.
static LANG_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<pre><code class="language-([^"]*)">"#).unwrap());

/// Rewrite rendered code blocks into prettifier-friendly markup.
///
/// The markdown pass puts the language on the `<code>` element; the theme's
/// prettifier wants `prettyprint`/`lang-*` classes on the `<pre>` instead.
#[must_use]
pub fn fix_code_blocks(html: &str) -> String {
    let fixed = LANG_CODE_RE.replace_all(html, "<pre class='prettyprint lang-$1'><code>");
    fixed.replace("<pre><code>", "<pre class='prettyprint'><code>")
}
