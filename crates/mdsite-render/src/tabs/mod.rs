//! Togglable tab blocks for markdown.
//!
//! Expands wikitext tab markup into Bootstrap nav/tab-pane HTML:
//!
//! ```text
//! <tabber>macOS=
//! Install with Homebrew.
//! |-|Linux=
//! Install with apt.
//! </tabber>
//! ```
//!
//! # Architecture
//!
//! Three-stage processing around the generic markdown pass:
//!
//! 1. **Preprocessing** ([`TabberPreprocessor`]): rewrites `<tabber>` blocks
//!    into bracket-marker sections (a key list and a content list) whose tab
//!    contents remain ordinary markdown blocks.
//! 2. **Block isolation** ([`TabScaffoldIsolator`]): wraps the marker
//!    scaffolding in `<tabbed-nav>` raw-HTML containers so the markdown pass
//!    carries it through untouched, while tab contents render normally.
//! 3. **Post-processing** ([`TabsPostprocessor`]): classifies each marker
//!    line in the final HTML and emits the Bootstrap nav list and tab panes,
//!    pairing link and pane identifiers through a [`KeyRegistry`].

pub(crate) mod fence;
mod postprocessor;
mod preprocessor;
mod scaffold;

pub use postprocessor::{KeyRegistry, TabsPostprocessor};
pub use preprocessor::TabberPreprocessor;
pub use scaffold::TabScaffoldIsolator;
