use std::ops::Range;

use crate::tag::TagDescriptor;

/// All types of tokens.
///
/// Tokens are units of of bbcode tags, borrowing from the scanned source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// Tag head, opens a tag.
    ///
    /// Newlines are line break tag heads.
    Head(TagHead<'a>),

    /// Tag tail, closes a tag.
    Tail(TagTail<'a>),

    /// Plain text.
    Text(&'a str),
}

/// Tag head.
///
/// `[$name=$attr]` or `[$name]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagHead<'a> {
    /// Registered tag the name refers to.
    pub descriptor: &'static TagDescriptor,

    /// Tag name as written.
    pub name: &'a str,

    /// Optional attribute.
    pub attr: Option<&'a str>,

    /// Byte range in source, brackets included.
    pub span: Range<usize>,

    /// Source text in [TagHead::span].
    pub raw: &'a str,
}

/// Tag tail.
///
/// `[/$name]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagTail<'a> {
    /// Registered tag the name refers to.
    pub descriptor: &'static TagDescriptor,

    /// Tag name as written.
    pub name: &'a str,

    /// Byte range in source, brackets included.
    pub span: Range<usize>,

    /// Source text in [TagTail::span].
    pub raw: &'a str,
}

impl<'a> Token<'a> {
    /// The source text this token was scanned from.
    pub fn raw(&self) -> &'a str {
        match self {
            Token::Head(v) => v.raw,
            Token::Tail(v) => v.raw,
            Token::Text(v) => v,
        }
    }
}
