//! Byte ranges into the source text.

/// A half-open byte range `start..end` in the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// A zero-width span at `pos`, used for end-of-input positions.
    #[inline]
    pub fn empty(pos: u32) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The source text covered by this span.
    #[inline]
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start as usize..self.end as usize]
    }

    /// 1-based line and column of the start of this span.
    ///
    /// Columns count characters, not bytes. Offsets past the end of `source`
    /// are clamped to the end.
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let offset = (self.start as usize).min(source.len());
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.start as usize..span.end as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let source = "!session\nroom\n  user";
        assert_eq!(Span::empty(0).line_col(source), (1, 1));
        assert_eq!(Span::new(9, 13).line_col(source), (2, 1));
        assert_eq!(Span::new(16, 20).line_col(source), (3, 3));
    }

    #[test]
    fn test_line_col_clamps_past_end() {
        let source = "!a\nb";
        assert_eq!(Span::empty(99).line_col(source), (2, 2));
    }
}
