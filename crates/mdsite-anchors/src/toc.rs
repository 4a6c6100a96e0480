//! Bootstrap side-navigation rendering from a heading list.

use std::fmt::Write;

use crate::engine::Heading;
use crate::escape::escape_html;

/// Render the nested side-navigation list for a page's headings.
///
/// Level-1 headings become top-level items; a level increase opens a nested
/// `<ul class='nav'>` under the preceding item and a decrease closes back out
/// to the matching depth. Only the first item is marked active. An empty
/// heading list renders as an empty string.
#[must_use]
pub fn render_sidenav(headings: &[Heading]) -> String {
    let Some((first, rest)) = headings.split_first() else {
        return String::new();
    };

    let mut out = String::from("<ul class='nav bs-docs-sidenav'>");
    out.push_str("<li class='active'>");
    push_link(&mut out, first);

    // Levels of the currently open nested lists, innermost last.
    let mut open_lists: Vec<u8> = Vec::new();
    let mut last_level = first.level;

    for heading in rest {
        if heading.level > last_level {
            out.push_str("<ul class='nav'><li>");
            open_lists.push(heading.level);
        } else {
            while open_lists.last().is_some_and(|&open| open > heading.level) {
                out.push_str("</li></ul>");
                open_lists.pop();
            }
            out.push_str("</li><li>");
        }
        push_link(&mut out, heading);
        last_level = heading.level;
    }

    out.push_str("</li>");
    for _ in open_lists {
        out.push_str("</ul></li>");
    }
    out.push_str("</ul>");
    out
}

fn push_link(out: &mut String, heading: &Heading) {
    write!(
        out,
        "<a href='#{}' data-scroll data-url>{}</a>",
        heading.hook,
        escape_html(&heading.text)
    )
    .unwrap();
}
