//! Output-path patterns.
//!
//! The output pattern names each slate with tokens drawn from the row being
//! merged: `<Title>` looks a cell up by column name, `<2>` by position, and
//! a bare `<>` consumes the next cell left to right. Everything outside the
//! brackets is literal. Cell values are tidied into filesystem-friendly
//! segments before substitution.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

/// Pattern-level errors, fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The configured pattern was empty.
    Empty,
    /// A `<` was never closed.
    Unclosed(String),
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::Empty => write!(f, "output pattern is empty"),
            PatternError::Unclosed(rest) => {
                write!(f, "output pattern has an unclosed token at {:?}", rest)
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// Row-level resolution failure carrying every token that had no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveError {
    tokens: Vec<String>,
}

impl ResolveError {
    /// The tokens that could not be resolved, in pattern order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unresolved tokens: {}", self.tokens.join(", "))
    }
}

impl std::error::Error for ResolveError {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `<>`: the next positional cell.
    Anon,
    /// `<2>`: the cell at a 0-based position.
    Index(usize),
    /// `<Title>`: the cell under a named column.
    Named(String),
}

/// A parsed output-path pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a bracket-token pattern.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        let mut segments = Vec::new();
        let mut rest = pattern;
        while let Some(open) = rest.find('<') {
            if !rest[..open].is_empty() {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after = &rest[open + 1..];
            let close = after
                .find('>')
                .ok_or_else(|| PatternError::Unclosed(rest[open..].to_string()))?;
            let name = &after[..close];
            segments.push(if name.is_empty() {
                Segment::Anon
            } else if let Ok(index) = name.parse::<usize>() {
                Segment::Index(index)
            } else {
                Segment::Named(name.to_string())
            });
            rest = &after[close + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }
        Ok(PathPattern { segments })
    }

    /// True when the pattern contains at least one substitutable token.
    pub fn has_tokens(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| !matches!(segment, Segment::Literal(_)))
    }

    /// Resolve the pattern against one data row.
    ///
    /// Builds both substitution contexts first (positional cells and
    /// column-named cells, both tidied, both omitting empty source cells),
    /// then walks the segments. Misses are collected rather than failing
    /// fast, so a row reports all of its unresolved tokens at once.
    pub fn resolve(&self, header: &[String], row: &[String]) -> Result<String, ResolveError> {
        let positional: Vec<Option<String>> = row
            .iter()
            .map(|cell| (!cell.is_empty()).then(|| tidy(cell)))
            .collect();
        let named: HashMap<&str, String> = header
            .iter()
            .zip(row.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(name, cell)| (name.as_str(), tidy(cell)))
            .collect();

        let mut out = String::new();
        let mut unresolved = Vec::new();
        let mut next_anon = 0usize;
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Anon => {
                    let index = next_anon;
                    next_anon += 1;
                    match positional.get(index).and_then(|cell| cell.as_deref()) {
                        Some(value) => out.push_str(value),
                        None => unresolved.push("<>".to_string()),
                    }
                }
                Segment::Index(index) => {
                    match positional.get(*index).and_then(|cell| cell.as_deref()) {
                        Some(value) => out.push_str(value),
                        None => unresolved.push(format!("<{}>", index)),
                    }
                }
                Segment::Named(name) => match named.get(name.as_str()) {
                    Some(value) => out.push_str(value),
                    None => unresolved.push(format!("<{}>", name)),
                },
            }
        }
        if unresolved.is_empty() {
            Ok(out)
        } else {
            Err(ResolveError { tokens: unresolved })
        }
    }
}

static EDGE_TRIM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\W_]+|[\W_]+$").unwrap());
static ASPECT_RATIO: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+):(\d+)").unwrap());
static NON_WORD_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").unwrap());
static UNDERSCORE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"__+").unwrap());

/// Tidy arbitrary cell text into a filesystem-friendly path segment.
///
/// Leading and trailing symbol runs go away, `16:9`-style ratios become
/// `16x9`, every other symbol or whitespace run collapses to a single
/// underscore. The steps apply in that order.
pub fn tidy(text: &str) -> String {
    let chopped = EDGE_TRIM.replace_all(text, "");
    let ratioed = ASPECT_RATIO.replace_all(&chopped, "${1}x${2}");
    let flattened = NON_WORD_RUN.replace_all(&ratioed, "_");
    UNDERSCORE_RUN.replace_all(&flattened, "_").into_owned()
}
