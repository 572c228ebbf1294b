use tracing::trace;

use crate::scanner::Scanner;
use crate::tag::{info, lookup, TagKind};
use crate::token::{TagHead, TagTail, Token};
use crate::{CLOSE, CR, EQUAL, LF, OPEN, SLASH};

/// Result of scanning from a `[`.
enum Candidate<'a> {
    /// A registered tag, and the position right after it.
    Tag(Token<'a>, usize),

    /// Not a tag, source before the position is plain text.
    Literal(usize),
}

/// Lazily split source into [Token]s.
///
/// Tags are checked against the registry but nesting is not validated here. Anything that does
/// not form a known tag falls back into text, and consecutive text is always emitted as one
/// [Token::Text].
pub struct Lexer<'a> {
    /// Inner scanner.
    source: Scanner<'a>,

    /// Start position of current constructing token.
    start: usize,

    /// Tag scanned right after a text run, emitted on the next call.
    pending: Option<Token<'a>>,
}

/// Tokenize `input`.
pub fn tokenize(input: &str) -> Lexer<'_> {
    Lexer::new(input)
}

impl<'a> Lexer<'a> {
    pub fn new(data: &'a str) -> Self {
        Self {
            source: Scanner::new(data),
            start: 0,
            pending: None,
        }
    }

    /// Emit `token` which occupies `start..end`.
    ///
    /// If there is text not emitted before `start`, emit the text first and hold the token for
    /// the next call.
    fn emit(&mut self, token: Token<'a>, start: usize, end: usize) -> Token<'a> {
        let text = self.source.get_range(self.start, start);
        self.source.seek(end);
        self.start = end;
        if text.is_empty() {
            token
        } else {
            self.pending = Some(token);
            Token::Text(text)
        }
    }

    /// Construct a line break from source `start..end`.
    fn line_break(&self, start: usize, end: usize) -> Token<'a> {
        let raw = self.source.get_range(start, end);
        Token::Head(TagHead {
            descriptor: info(TagKind::LineBreak),
            name: raw,
            attr: None,
            span: start..end,
            raw,
        })
    }

    /// Try construct a [Token::Head] or [Token::Tail] from input.
    ///
    /// The caller shall ensure current position is on the `[`.
    fn scan_tag(&self, at: usize) -> Candidate<'a> {
        let body_start = at + OPEN.len_utf8();
        let body = &self.source.rest()[OPEN.len_utf8()..];
        let mut equal = None;

        for (idx, ch) in body.char_indices() {
            match ch {
                CLOSE => {
                    return self.collect_tag(at, &body[..idx], equal, body_start + idx + 1);
                }
                // Another `[` before the tag name finishes, invalid head.
                // Keep the unexpected `[` out of text and restart from there.
                OPEN if equal.is_none() => return Candidate::Literal(body_start + idx),
                // Tags never span lines, leave the line break to be scanned again.
                LF => return Candidate::Literal(body_start + idx),
                CR if body[idx + CR.len_utf8()..].starts_with(LF) => {
                    return Candidate::Literal(body_start + idx)
                }
                EQUAL if equal.is_none() => equal = Some(idx),
                _ => {}
            }
        }

        // Never closed.
        Candidate::Literal(body_start + body.len())
    }

    /// The caller shall ensure `at` is on the `[` and `end` is right after the `]`:
    ///
    /// ```console
    /// [ n a m e = a t t r ]
    /// |  |      |          |
    /// |  |      |          |-> end
    /// |  |      |-> equal, relative to inner
    /// |  |-> inner
    /// |-> at
    /// ```
    fn collect_tag(
        &self,
        at: usize,
        inner: &'a str,
        equal: Option<usize>,
        end: usize,
    ) -> Candidate<'a> {
        let raw = self.source.get_range(at, end);

        if let Some(name) = inner.strip_prefix(SLASH) {
            if equal.is_some() {
                trace!("tail with attribute {raw:?}, fallback to text");
                return Candidate::Literal(end);
            }
            return match lookup(name) {
                Some(descriptor) => Candidate::Tag(
                    Token::Tail(TagTail {
                        descriptor,
                        name,
                        span: at..end,
                        raw,
                    }),
                    end,
                ),
                None => {
                    trace!("unknown tail {raw:?}, fallback to text");
                    Candidate::Literal(end)
                }
            };
        }

        let (name, attr) = match equal {
            Some(v) => (&inner[..v], Some(&inner[v + EQUAL.len_utf8()..])),
            None => (inner, None),
        };

        match lookup(name) {
            Some(descriptor) => Candidate::Tag(
                Token::Head(TagHead {
                    descriptor,
                    name,
                    attr,
                    span: at..end,
                    raw,
                }),
                end,
            ),
            None => {
                trace!("unknown head {raw:?}, fallback to text");
                Candidate::Literal(end)
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }

        while let Some(ch) = self.source.curr() {
            let position = self.source.position();
            match ch {
                OPEN => match self.scan_tag(position) {
                    Candidate::Tag(token, end) => return Some(self.emit(token, position, end)),
                    Candidate::Literal(end) => self.source.seek(end),
                },
                LF => {
                    let end = position + LF.len_utf8();
                    let token = self.line_break(position, end);
                    return Some(self.emit(token, position, end));
                }
                CR if self.source.peek() == Some(LF) => {
                    let end = position + CR.len_utf8() + LF.len_utf8();
                    let token = self.line_break(position, end);
                    return Some(self.emit(token, position, end));
                }
                _ => {
                    self.source.next();
                }
            }
        }

        // Reached the end, the rest is text.
        let text = self.source.get_range(self.start, self.source.position());
        self.start = self.source.position();
        if text.is_empty() {
            None
        } else {
            Some(Token::Text(text))
        }
    }
}
