//! Slate emission.

use crate::ttg::codec;
use crate::ttg::template::TtgTemplate;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write one slate: the template with every keyword slot replaced by the
/// row's value for that keyword.
///
/// Walking the lines 1-based: a line whose number is in the keyword map is
/// the length header of a slot, so a fresh `TextLength`/`Text` pair is
/// emitted from the row value. Absent keywords become the empty value, and
/// the bracket wrapper is not reproduced; the output carries a value, not a
/// keyword. The line after a header, the superseded encoding line, is
/// dropped. Everything else is copied through verbatim.
pub fn write_slate(
    path: &Path,
    template: &TtgTemplate,
    values: &HashMap<String, String>,
) -> io::Result<()> {
    let keywords = template.keywords();
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    for (index, line) in template.lines().iter().enumerate() {
        let number = index + 1;
        if let Some(keyword) = keywords.get(&number) {
            let value = values.get(keyword).map(String::as_str).unwrap_or("");
            let codes = codec::encode(value);
            writeln!(out, "TextLength {}", codes.split_whitespace().count())?;
            writeln!(out, "Text {}", codes)?;
        } else if keywords.contains_key(&(number - 1)) {
            continue;
        } else {
            writeln!(out, "{}", line)?;
        }
    }
    out.flush()
}
