//! Fixtures shared by unit tests, integration tests, and downstream crates'
//! test suites.

/// A six-line slate template with one `<Title>` slot at lines 3 and 4.
pub fn one_slot_template() -> Vec<String> {
    [
        "Module Text",
        "Version 2025",
        "TextLength 7",
        "Text 60 84 105 116 108 101 62",
        "Transparency 100",
        "End",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect()
}

/// Source text of [`one_slot_template`], ready to write to disk.
pub fn one_slot_template_source() -> String {
    let mut source = one_slot_template().join("\n");
    source.push('\n');
    source
}

/// A header row plus two spots, as CSV source.
pub fn two_spot_csv() -> String {
    "Title,Duration\nSpot A,30\nSpot B,60\n".to_string()
}
