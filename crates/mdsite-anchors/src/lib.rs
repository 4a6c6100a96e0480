//! Heading anchors and table-of-contents support for rendered pages.
//!
//! This crate operates on HTML fragments that have already been produced by
//! the markdown pass. It assigns each visible `h1`–`h3` heading a unique,
//! human-readable anchor slug ("hook"), injects the slug as the heading's
//! `id` attribute, and renders a nested Bootstrap side-navigation list
//! mirroring the heading hierarchy.
//!
//! # Architecture
//!
//! Slug state lives in a [`SlugAllocator`] owned by an [`AnchorEngine`]; both
//! are per-document values, created for one render and discarded afterwards.
//! The engine offers two ways to process a fragment:
//!
//! - [`AnchorEngine::annotate`]: a single traversal that collects the heading
//!   list and attaches `id` attributes in one pass. This is what the page
//!   pipeline uses.
//! - [`AnchorEngine::extract`] followed by [`AnchorEngine::attach`]: the
//!   two-pass protocol, where the second pass re-associates slugs issued by
//!   the first through order-sensitive reclamation. The passes must see the
//!   same headings in the same order.
//!
//! Malformed fragments surface as [`AnchorError`]; callers are expected to
//! log and fall back to the unmodified content rather than abort a build.

mod allocator;
mod engine;
mod error;
mod escape;
mod slug;
mod toc;

pub use allocator::SlugAllocator;
pub use engine::{AnchorEngine, Annotated, Heading};
pub use error::AnchorError;
pub use escape::escape_html;
pub use slug::derive_slug;
pub use toc::render_sidenav;
