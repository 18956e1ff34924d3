//! Line tokenizer for the DDF grammar.
//!
//! Tokens keep their byte offsets into the source line so the parser can
//! slice free text (descriptions, quoted strings, bracketed literals)
//! straight out of the raw line instead of re-joining tokens.

/// A run of characters from a line, with its byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    /// Offset of the first byte.
    pub start: usize,
    /// Offset one past the last byte.
    pub end: usize,
}

impl<'a> Token<'a> {
    fn new(line: &'a str, start: usize, end: usize) -> Self {
        Self {
            text: &line[start..end],
            start,
            end,
        }
    }

    /// Returns a copy with both offsets moved by `by`.
    pub fn shifted(self, by: usize) -> Self {
        Self {
            start: self.start + by,
            end: self.end + by,
            ..self
        }
    }
}

/// A token or the delimiter run between tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Token(Token<'a>),
    Gap(Token<'a>),
}

impl<'a> Segment<'a> {
    /// Returns the underlying run.
    pub fn run(&self) -> Token<'a> {
        match self {
            Segment::Token(t) | Segment::Gap(t) => *t,
        }
    }

    /// Returns the token if this segment is one.
    pub fn token(&self) -> Option<Token<'a>> {
        match self {
            Segment::Token(t) => Some(*t),
            Segment::Gap(_) => None,
        }
    }
}

/// Splits a line into maximal runs, alternating tokens and delimiter gaps.
///
/// Leading and trailing gaps are included. Concatenating every segment's
/// text reproduces the line exactly.
pub fn segments<'a>(line: &'a str, delimiters: &str) -> Vec<Segment<'a>> {
    let mut out = Vec::new();
    let mut run_start = 0;
    let mut run_is_gap: Option<bool> = None;

    for (idx, ch) in line.char_indices() {
        let is_gap = delimiters.contains(ch);
        match run_is_gap {
            Some(prev) if prev != is_gap => {
                out.push(make_segment(line, run_start, idx, prev));
                run_start = idx;
            }
            _ => {}
        }
        run_is_gap = Some(is_gap);
    }
    if let Some(prev) = run_is_gap {
        out.push(make_segment(line, run_start, line.len(), prev));
    }
    out
}

/// Splits a line into its non-delimiter runs.
pub fn split<'a>(line: &'a str, delimiters: &str) -> Vec<Token<'a>> {
    segments(line, delimiters)
        .iter()
        .filter_map(Segment::token)
        .collect()
}

/// Splits a line into non-delimiter runs, keeping double-quoted text
/// (delimiters included) inside a single token.
///
/// A quote left open runs to the end of the line.
pub fn split_quoted<'a>(line: &'a str, delimiters: &str) -> Vec<Token<'a>> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    let mut in_string = false;

    for (idx, ch) in line.char_indices() {
        if ch == '"' {
            in_string = !in_string;
        }
        let is_gap = !in_string && delimiters.contains(ch);
        match (start, is_gap) {
            (None, false) => start = Some(idx),
            (Some(s), true) => {
                out.push(Token::new(line, s, idx));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push(Token::new(line, s, line.len()));
    }
    out
}

fn make_segment(line: &str, start: usize, end: usize, is_gap: bool) -> Segment<'_> {
    let run = Token::new(line, start, end);
    if is_gap {
        Segment::Gap(run)
    } else {
        Segment::Token(run)
    }
}
