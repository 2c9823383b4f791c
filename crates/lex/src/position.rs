use std::fmt;

/// A 1-based line/column pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Half-open span `start..end` in the source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub start: Location,
    pub end: Location,
}

impl Position {
    pub fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            start: Location::new(start_line, start_column),
            end: Location::new(end_line, end_column),
        }
    }

    pub fn between(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    /// A zero-width span, used for the end-of-input token.
    pub fn point(location: Location) -> Self {
        Self {
            start: location,
            end: location,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::point(Location::new(1, 1))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
