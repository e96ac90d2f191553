//! Letter rendering collaborator
//!
//! Turns a consolidated response into letter content ([`LetterOutline`]) and
//! renders it through a [`DocumentRenderer`].

pub mod outline;
pub mod pleading;

pub use outline::{format_currency, LetterBlock, LetterOptions, LetterOutline};
pub use pleading::PleadingPaperRenderer;

/// Output format for an exported letter
pub trait DocumentRenderer: Send + Sync {
    /// MIME type of the rendered bytes
    fn content_type(&self) -> &'static str;

    /// Suggested download name
    fn file_name(&self) -> &'static str;

    fn render(&self, outline: &LetterOutline) -> Vec<u8>;
}
