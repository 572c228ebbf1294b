/// Scanner on a string.
///
/// Provide convienient APIs on operation. Positions are byte offsets and always sit on char
/// boundaries.
pub(crate) struct Scanner<'a> {
    /// The whole source.
    source: &'a str,

    /// Current position.
    position: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(source: &'a str) -> Scanner<'a> {
        Self {
            source,
            position: 0,
        }
    }

    /// Get character at the current position.
    pub fn curr(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Get the character after the current one, without advancing the current position.
    pub fn peek(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    /// Move the position forward and return the character walked through.
    ///
    /// Return `None` if already finished.
    pub fn next(&mut self) -> Option<char> {
        let ch = self.curr()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    /// Move to `position`.
    ///
    /// The caller must ensure the position is on a char boundary.
    pub fn seek(&mut self, position: usize) {
        self.position = position.min(self.source.len());
    }

    /// Get the text from [start] to [end], excluding end pos.
    ///
    /// The caller must ensure sizes not out of range.
    pub fn get_range(&self, start: usize, end: usize) -> &'a str {
        &self.source[start..end]
    }

    /// Text from the current position to the end.
    pub fn rest(&self) -> &'a str {
        &self.source[self.position..]
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_multibyte() {
        let mut scanner = Scanner::new("a番b");
        assert_eq!(scanner.curr(), Some('a'));
        assert_eq!(scanner.peek(), Some('番'));
        assert_eq!(scanner.next(), Some('a'));
        assert_eq!(scanner.next(), Some('番'));
        assert_eq!(scanner.position(), 4);
        assert_eq!(scanner.get_range(1, 4), "番");
        assert_eq!(scanner.next(), Some('b'));
        assert!(scanner.rest().is_empty());
        assert_eq!(scanner.next(), None);
        assert_eq!(scanner.peek(), None);
    }

    #[test]
    fn test_seek() {
        let mut scanner = Scanner::new("[b]x");
        scanner.seek(3);
        assert_eq!(scanner.rest(), "x");
        scanner.seek(100);
        assert!(scanner.rest().is_empty());
    }
}
