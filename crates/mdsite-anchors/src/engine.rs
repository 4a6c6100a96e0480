//! Anchor engine: heading discovery and `id` attachment over HTML fragments.

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::allocator::SlugAllocator;
use crate::error::AnchorError;

/// Attribute that hides a heading from anchor generation and the TOC.
const HIDDEN_ATTR: &str = "data-hidden-from-toc";

/// One visible heading, recorded in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heading {
    /// Heading level, 1–3.
    pub level: u8,
    /// Leading text content of the heading element.
    pub text: String,
    /// Slug issued for this heading.
    pub hook: String,
}

/// Result of a single-pass [`AnchorEngine::annotate`] traversal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotated {
    /// The fragment with `id` attributes attached to visible headings.
    pub html: String,
    /// Visible headings in document order.
    pub headings: Vec<Heading>,
}

/// Which allocator operation a rewrite traversal uses per heading.
#[derive(Clone, Copy, Debug)]
enum SlugMode {
    Issue,
    Reclaim,
}

/// Walks HTML fragments and manages heading anchors for one document.
///
/// The engine owns a [`SlugAllocator`]; create one engine per document so
/// slug uniqueness is scoped to that render.
#[derive(Debug, Default)]
pub struct AnchorEngine {
    allocator: SlugAllocator,
}

/// In-flight capture of a heading element during a traversal.
struct HeadingCapture {
    start: BytesStart<'static>,
    level: u8,
    text: String,
    /// Set once a child element is seen; stops text accumulation so only the
    /// heading's leading text is captured.
    saw_child: bool,
    /// Open descendant elements inside the heading.
    inner: usize,
    /// Events between the heading's start and end tags, replayed on close.
    events: Vec<Event<'static>>,
}

impl HeadingCapture {
    fn begin(start: BytesStart<'static>, level: u8) -> Self {
        Self {
            start,
            level,
            text: String::new(),
            saw_child: false,
            inner: 0,
            events: Vec::new(),
        }
    }
}

impl AnchorEngine {
    /// Create an engine with an empty allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Access the underlying allocator.
    #[must_use]
    pub fn allocator(&self) -> &SlugAllocator {
        &self.allocator
    }

    /// Collect visible headings in document order, issuing a slug for each.
    ///
    /// The fragment itself is not modified. Use [`attach`](Self::attach) on a
    /// structurally identical fragment to inject the issued slugs, or prefer
    /// [`annotate`](Self::annotate) to do both in one traversal.
    ///
    /// # Errors
    ///
    /// Returns [`AnchorError`] when the fragment is not well formed.
    pub fn extract(&mut self, content: &str) -> Result<Vec<Heading>, AnchorError> {
        let wrapped = format!("<root>{content}</root>");
        let mut reader = Reader::from_str(&wrapped);
        let mut headings = Vec::new();
        let mut capture: Option<HeadingCapture> = None;

        loop {
            match reader.read_event()? {
                Event::Eof => break,
                Event::Start(e) => {
                    if let Some(cap) = capture.as_mut() {
                        cap.saw_child = true;
                        cap.inner += 1;
                    } else if let Some(level) = heading_level(e.name().as_ref())
                        && !is_hidden(&e)?
                    {
                        capture = Some(HeadingCapture::begin(e.into_owned(), level));
                    }
                }
                Event::End(_) => {
                    if let Some(mut cap) = capture.take() {
                        if cap.inner == 0 {
                            let hook = self.allocator.issue(&cap.text);
                            headings.push(Heading {
                                level: cap.level,
                                text: cap.text,
                                hook,
                            });
                        } else {
                            cap.inner -= 1;
                            capture = Some(cap);
                        }
                    }
                }
                Event::Text(t) => {
                    if let Some(cap) = capture.as_mut()
                        && !cap.saw_child
                        && cap.inner == 0
                    {
                        let decoded = t.decode().map_err(quick_xml::Error::from)?;
                        cap.text.push_str(&quick_xml::escape::unescape(&decoded)?);
                    }
                }
                Event::Empty(_) => {
                    if let Some(cap) = capture.as_mut() {
                        cap.saw_child = true;
                    }
                }
                _ => {}
            }
        }

        Ok(headings)
    }

    /// Attach previously issued slugs as heading `id` attributes.
    ///
    /// Re-associates slugs through order-sensitive reclamation: this pass
    /// must see the same visible headings, in the same order, as the
    /// [`extract`](Self::extract) pass that issued them. A heading with no
    /// matching issued slug silently receives the raw derived pattern.
    ///
    /// # Errors
    ///
    /// Returns [`AnchorError`] when the fragment is not well formed.
    pub fn attach(&mut self, content: &str) -> Result<String, AnchorError> {
        self.rewrite(content, SlugMode::Reclaim).map(|a| a.html)
    }

    /// Collect headings and attach their `id` attributes in one traversal.
    ///
    /// This replaces the extract/attach pair for callers that control both
    /// outputs: slugs are issued exactly once, so the order-sensitive
    /// reclamation step (and its misattribution mode) cannot occur.
    ///
    /// # Errors
    ///
    /// Returns [`AnchorError`] when the fragment is not well formed.
    pub fn annotate(&mut self, content: &str) -> Result<Annotated, AnchorError> {
        self.rewrite(content, SlugMode::Issue)
    }

    /// Shared read-write traversal behind [`attach`] and [`annotate`].
    ///
    /// [`attach`]: Self::attach
    /// [`annotate`]: Self::annotate
    fn rewrite(&mut self, content: &str, mode: SlugMode) -> Result<Annotated, AnchorError> {
        let wrapped = format!("<root>{content}</root>");
        let mut reader = Reader::from_str(&wrapped);
        let mut writer = Writer::new(Vec::new());
        let mut headings = Vec::new();
        let mut capture: Option<HeadingCapture> = None;
        let mut depth = 0usize;

        loop {
            match reader.read_event()? {
                Event::Eof => break,
                Event::Start(e) => {
                    depth += 1;
                    if let Some(cap) = capture.as_mut() {
                        cap.saw_child = true;
                        cap.inner += 1;
                        cap.events.push(Event::Start(e.into_owned()));
                    } else if depth > 1 {
                        if let Some(level) = heading_level(e.name().as_ref())
                            && !is_hidden(&e)?
                        {
                            capture = Some(HeadingCapture::begin(e.into_owned(), level));
                        } else {
                            writer.write_event(Event::Start(e))?;
                        }
                    }
                }
                Event::End(e) => {
                    depth = depth.saturating_sub(1);
                    if let Some(mut cap) = capture.take() {
                        if cap.inner == 0 {
                            let hook = match mode {
                                SlugMode::Issue => self.allocator.issue(&cap.text),
                                SlugMode::Reclaim => self.allocator.reclaim(&cap.text),
                            };
                            writer.write_event(Event::Start(with_id(&cap.start, &hook)?))?;
                            for ev in cap.events {
                                writer.write_event(ev)?;
                            }
                            writer.write_event(Event::End(e))?;
                            headings.push(Heading {
                                level: cap.level,
                                text: cap.text,
                                hook,
                            });
                        } else {
                            cap.inner -= 1;
                            cap.events.push(Event::End(e.into_owned()));
                            capture = Some(cap);
                        }
                    } else if depth >= 1 {
                        writer.write_event(Event::End(e))?;
                    }
                }
                Event::Text(t) => {
                    if let Some(cap) = capture.as_mut() {
                        if !cap.saw_child && cap.inner == 0 {
                            let decoded = t.decode().map_err(quick_xml::Error::from)?;
                            cap.text.push_str(&quick_xml::escape::unescape(&decoded)?);
                        }
                        cap.events.push(Event::Text(t.into_owned()));
                    } else {
                        writer.write_event(Event::Text(t))?;
                    }
                }
                Event::Empty(e) => {
                    if let Some(cap) = capture.as_mut() {
                        cap.saw_child = true;
                        cap.events.push(Event::Empty(e.into_owned()));
                    } else {
                        writer.write_event(Event::Empty(e))?;
                    }
                }
                other => {
                    if let Some(cap) = capture.as_mut() {
                        cap.events.push(other.into_owned());
                    } else {
                        writer.write_event(other)?;
                    }
                }
            }
        }

        let html = String::from_utf8(writer.into_inner())?;
        Ok(Annotated { html, headings })
    }
}

/// Map a tag name to a heading level the engine cares about.
fn heading_level(name: &[u8]) -> Option<u8> {
    match name {
        b"h1" => Some(1),
        b"h2" => Some(2),
        b"h3" => Some(3),
        _ => None,
    }
}

/// Whether a heading opts out of anchor generation.
fn is_hidden(e: &BytesStart<'_>) -> Result<bool, AnchorError> {
    Ok(e.try_get_attribute(HIDDEN_ATTR)?
        .is_some_and(|attr| attr.value.as_ref() == b"true"))
}

/// Rebuild a start tag with `hook` as its `id`, replacing any existing `id`.
fn with_id<'a>(start: &'a BytesStart<'a>, hook: &'a str) -> Result<BytesStart<'a>, AnchorError> {
    let name = String::from_utf8(start.name().as_ref().to_vec())?;
    let mut rebuilt = BytesStart::new(name);
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.as_ref() != b"id" {
            rebuilt.push_attribute(attr);
        }
    }
    rebuilt.push_attribute(("id", hook));
    Ok(rebuilt)
}
