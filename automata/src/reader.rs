use crate::{CompileError, CompileResult};

/// A half-open range of character offsets into a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// A cursor over one scope of a pattern
///
/// Positions are always absolute offsets into the full pattern, even for a
/// reader scoped to a group body, so errors point at the right character.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    pattern: &'a [char],
    pos: usize,
    end: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader over the whole pattern
    pub fn new(pattern: &'a [char]) -> Self {
        Self {
            pattern,
            pos: 0,
            end: pattern.len(),
        }
    }

    /// Create a reader over `span` of the same pattern
    pub fn scoped(&self, span: Span) -> Reader<'a> {
        Reader {
            pattern: self.pattern,
            pos: span.start,
            end: span.end.min(self.pattern.len()),
        }
    }

    /// Offset of the next character to be read
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn has_next(&self) -> bool {
        self.pos < self.end
    }

    /// Look at the next character without consuming it
    pub fn peek(&self) -> Option<char> {
        if self.has_next() {
            Some(self.pattern[self.pos])
        } else {
            None
        }
    }

    /// Consume the next character
    pub fn next(&mut self) -> CompileResult<char> {
        let ch = self.peek().ok_or(CompileError::Bounds {
            position: self.pos,
            len: self.pattern.len(),
        })?;
        self.pos += 1;
        Ok(ch)
    }

    /// Read the body of a group whose `(` was just consumed.
    ///
    /// Stops at the `)` that balances the opening one, consumes it, and
    /// returns the span between the parentheses.
    pub fn read_group(&mut self) -> CompileResult<Span> {
        let open = self.pos.saturating_sub(1);
        let start = self.pos;
        let mut depth = 1usize;
        for i in start..self.end {
            match self.pattern[i] {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos = i + 1;
                        return Ok(Span { start, end: i });
                    }
                }
                _ => {}
            }
        }
        Err(CompileError::UnclosedGroup { position: open })
    }

    /// Consume everything left in this scope
    pub fn read_remaining(&mut self) -> Span {
        let span = Span {
            start: self.pos,
            end: self.end,
        };
        self.pos = self.end;
        span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_peek_and_next() {
        let pattern = chars("ab");
        let mut reader = Reader::new(&pattern);
        assert_eq!(reader.peek(), Some('a'));
        assert_eq!(reader.next(), Ok('a'));
        assert_eq!(reader.next(), Ok('b'));
        assert!(!reader.has_next());
        assert_eq!(reader.peek(), None);
        assert_eq!(
            reader.next(),
            Err(CompileError::Bounds { position: 2, len: 2 })
        );
    }

    #[test]
    fn test_bounds_error_reports_pattern_length() {
        let pattern = chars("(a)b");
        let reader = Reader::new(&pattern);
        let mut inner = reader.scoped(Span { start: 1, end: 2 });
        assert_eq!(inner.next(), Ok('a'));
        assert_eq!(
            inner.next(),
            Err(CompileError::Bounds { position: 2, len: 4 })
        );
    }

    #[test]
    fn test_read_group_balanced() {
        let pattern = chars("(a(b)c)d");
        let mut reader = Reader::new(&pattern);
        assert_eq!(reader.next(), Ok('('));
        let body = reader.read_group().unwrap();
        assert_eq!(body, Span { start: 1, end: 6 });
        assert_eq!(reader.next(), Ok('d'));

        let mut inner = reader.scoped(body);
        assert_eq!(inner.position(), 1);
        assert_eq!(inner.next(), Ok('a'));
        assert_eq!(inner.next(), Ok('('));
        assert_eq!(inner.read_group(), Ok(Span { start: 3, end: 4 }));
        assert_eq!(inner.next(), Ok('c'));
        assert!(!inner.has_next());
    }

    #[test]
    fn test_read_group_unclosed() {
        let pattern = chars("x((a)");
        let mut reader = Reader::new(&pattern);
        reader.next().unwrap();
        reader.next().unwrap();
        assert_eq!(
            reader.read_group(),
            Err(CompileError::UnclosedGroup { position: 1 })
        );
    }

    #[test]
    fn test_read_group_does_not_escape_scope() {
        let pattern = chars("((a)b)");
        let reader = Reader::new(&pattern);
        let mut inner = reader.scoped(Span { start: 1, end: 3 });
        inner.next().unwrap();
        assert_eq!(
            inner.read_group(),
            Err(CompileError::UnclosedGroup { position: 1 })
        );
    }

    #[test]
    fn test_read_remaining() {
        let pattern = chars("a|bc");
        let mut reader = Reader::new(&pattern);
        reader.next().unwrap();
        reader.next().unwrap();
        let rest = reader.read_remaining();
        assert_eq!(rest, Span { start: 2, end: 4 });
        assert_eq!(rest.len(), 2);
        assert!(!reader.has_next());
        assert!(reader.read_remaining().is_empty());
    }
}
