//! Template loading and keyword-slot scanning.

use crate::ttg::codec;
use log::debug;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Literal markers of a keyword encoding line: `60` and `62` are the codes
/// for `<` and `>`.
const KEYWORD_PREFIX: &str = "Text 60";
const KEYWORD_SUFFIX: &str = "62";

/// Error loading a TTG template file.
#[derive(Debug)]
pub enum TemplateError {
    /// The file could not be read.
    Io(String),
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::Io(msg) => write!(f, "TTG template not readable: {}", msg),
        }
    }
}

impl std::error::Error for TemplateError {}

/// A loaded TTG template and the keyword slots found in it.
#[derive(Debug, Clone, Default)]
pub struct TtgTemplate {
    lines: Vec<String>,
    keywords: BTreeMap<usize, String>,
}

impl TtgTemplate {
    /// Read a template from disk and scan it for keyword slots.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let source = fs::read_to_string(path).map_err(|err| TemplateError::Io(err.to_string()))?;
        Ok(Self::from_lines(source.lines().map(str::to_string).collect()))
    }

    /// Scan template lines for keyword slots.
    ///
    /// A line is a keyword encoding line iff it starts with `Text 60` and
    /// ends with `62`. Each hit is recorded against the line above it, the
    /// `TextLength` header, which is where the writer treats the slot as
    /// beginning. No other validation is applied to the file; an empty
    /// template just yields an empty map.
    pub fn from_lines(lines: Vec<String>) -> Self {
        let mut keywords = BTreeMap::new();
        for (index, line) in lines.iter().enumerate() {
            let number = index + 1;
            if !is_keyword_line(line) {
                continue;
            }
            let payload = line.strip_prefix("Text ").unwrap_or(line);
            match codec::decode_bracketed(payload) {
                Ok(keyword) => {
                    keywords.insert(number - 1, keyword);
                }
                Err(err) => {
                    debug!("line {}: undecodable keyword skipped: {}", number, err);
                }
            }
        }
        TtgTemplate { lines, keywords }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Keyword slots keyed by their length-header line number.
    pub fn keywords(&self) -> &BTreeMap<usize, String> {
        &self.keywords
    }

    /// Keyword names in template order.
    pub fn keyword_names(&self) -> Vec<&str> {
        self.keywords.values().map(String::as_str).collect()
    }

    /// True when the template has at least one substitutable slot.
    pub fn has_keywords(&self) -> bool {
        !self.keywords.is_empty()
    }
}

fn is_keyword_line(line: &str) -> bool {
    line.starts_with(KEYWORD_PREFIX) && line.ends_with(KEYWORD_SUFFIX)
}
