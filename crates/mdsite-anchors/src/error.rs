//! Error type for anchor processing.

/// Anchor processing error.
///
/// Fragments reach this crate after the markdown pass, so failures almost
/// always mean the page contains hand-written HTML that does not parse as a
/// fragment. Callers should log the error with the page identity and keep
/// the original content rather than abort the build.
#[derive(Debug, thiserror::Error)]
pub enum AnchorError {
    /// The fragment is not well formed.
    #[error("malformed fragment: {0}")]
    Xml(#[from] quick_xml::Error),
    /// An element carries a malformed attribute list.
    #[error("malformed attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
    /// Text content contains an invalid character escape.
    #[error("invalid character escape: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),
    /// Re-serialization failed.
    #[error("serialization error: {0}")]
    Io(#[from] std::io::Error),
    /// Re-serialization produced invalid UTF-8.
    #[error("serialization produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
