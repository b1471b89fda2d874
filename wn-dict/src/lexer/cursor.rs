/// A cursor over a single line of dictionary source.
///
/// Every advancing method moves by whole characters, so slicing the line at
/// [`LineCursor::pos`] is always valid UTF-8.
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(line: &'a str) -> Self {
        LineCursor { line, pos: 0 }
    }

    pub fn line(&self) -> &'a str {
        self.line
    }

    /// Byte offset of the cursor within the line
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn eol(&self) -> bool {
        self.pos >= self.line.len()
    }

    /// The unconsumed remainder of the line
    pub fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes the current character and advances the position.
    /// Returns the character that was consumed, or None at end of line.
    pub fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume `s` if the remainder starts with it
    pub fn eat_str(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Consume characters while `pred` holds; true if anything was consumed
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> bool {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        self.pos > start
    }

    pub fn eat_whitespace(&mut self) -> bool {
        self.eat_while(char::is_whitespace)
    }

    /// Move to the next occurrence of `pat` without consuming it.
    /// Leaves the cursor untouched and returns false if there is none.
    pub fn skip_to(&mut self, pat: &str) -> bool {
        match self.rest().find(pat) {
            Some(at) => {
                self.pos += at;
                true
            }
            None => false,
        }
    }

    pub fn skip_to_end(&mut self) {
        self.pos = self.line.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_advances_by_char() {
        let mut cursor = LineCursor::new("ナa");
        assert_eq!(cursor.next(), Some('ナ'));
        assert_eq!(cursor.pos(), 'ナ'.len_utf8());
        assert_eq!(cursor.next(), Some('a'));
        assert!(cursor.eol());
        assert_eq!(cursor.next(), None);
    }

    #[test]
    fn test_skip_to() {
        let mut cursor = LineCursor::new("pen --> fountain pen");
        assert!(cursor.skip_to("-->"));
        assert_eq!(cursor.rest(), "--> fountain pen");
        assert!(!cursor.skip_to("//"));
        assert_eq!(cursor.pos(), 4);
    }

    #[test]
    fn test_eat_helpers() {
        let mut cursor = LineCursor::new("}   // c");
        assert!(cursor.eat_str("}"));
        assert!(cursor.eat_whitespace());
        assert_eq!(cursor.rest(), "// c");
        assert!(!cursor.eat_whitespace());
        cursor.skip_to_end();
        assert!(cursor.eol());
    }
}
