use std::iter::Sum;
use std::ops::{Add, AddAssign, Range};

/// A file id handed out by the driver's source map.
pub type File = usize;

/// A byte range within a single source file.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub file: File,
}

impl Span {
    pub fn new(file: File, start: usize, end: usize) -> Self {
        Self { start, end, file }
    }

    /// The smallest span covering both `self` and `other`. Spans from
    /// different files never merge.
    pub fn merge(self, other: Span) -> Span {
        assert_eq!(self.file, other.file);

        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            file: self.file,
        }
    }
}

impl Add for Span {
    type Output = Span;

    fn add(self, rhs: Span) -> Span {
        self.merge(rhs)
    }
}

impl AddAssign for Span {
    fn add_assign(&mut self, rhs: Span) {
        *self = self.merge(rhs);
    }
}

/// Diagnostic labels address plain byte ranges.
impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// Summing joins the spans of a non-empty statement sequence. An empty sum
/// has no file to name.
impl Sum for Span {
    fn sum<I: Iterator<Item = Self>>(mut iter: I) -> Self {
        let first = iter.next().unwrap();
        iter.fold(first, Span::merge)
    }
}
