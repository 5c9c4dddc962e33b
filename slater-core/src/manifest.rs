//! The HTML manifest: a copy-paste page listing every produced slate name.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// The compiled-in manifest page, used when no template path is configured.
const DEFAULT_TEMPLATE: &str = include_str!("../assets/copy_paster.html");

/// Default manifest file name.
pub const DEFAULT_FILENAME: &str = "copy_paster.html";

/// Default 1-based line in the manifest template that the name entries
/// replace.
pub const DEFAULT_INSERT_LINE: usize = 40;

/// Error loading a manifest template file.
#[derive(Debug)]
pub enum ManifestError {
    /// The file could not be read.
    Io(String),
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestError::Io(msg) => write!(f, "HTML template not readable: {}", msg),
        }
    }
}

impl std::error::Error for ManifestError {}

/// A loaded manifest template.
#[derive(Debug, Clone)]
pub struct ManifestTemplate {
    lines: Vec<String>,
}

impl ManifestTemplate {
    /// The compiled-in default page.
    pub fn built_in() -> Self {
        Self::from_source(DEFAULT_TEMPLATE)
    }

    /// Read a template from disk.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let source =
            std::fs::read_to_string(path).map_err(|err| ManifestError::Io(err.to_string()))?;
        Ok(Self::from_source(&source))
    }

    pub fn from_source(source: &str) -> Self {
        ManifestTemplate {
            lines: source.lines().map(str::to_string).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Write the manifest: every template line verbatim, except the line at
/// 1-based `insert_line`, which becomes one button per name. The name is
/// both the visible label and the clipboard payload. A template shorter
/// than the insertion line emits no entries.
pub fn write_manifest(
    path: &Path,
    template: &ManifestTemplate,
    insert_line: usize,
    names: &[String],
) -> io::Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    for (index, line) in template.lines.iter().enumerate() {
        if index + 1 == insert_line {
            for name in names {
                writeln!(out, "{}", entry_markup(name))?;
            }
        } else {
            writeln!(out, "{}", line)?;
        }
    }
    out.flush()
}

fn entry_markup(name: &str) -> String {
    format!(
        "  <button\n        data-clipboard-text=\"{0}\">{0}</button>",
        name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn built_in_template_has_the_insert_line() {
        let template = ManifestTemplate::built_in();
        assert!(template.lines().len() >= DEFAULT_INSERT_LINE);
        assert!(template.lines()[DEFAULT_INSERT_LINE - 1].contains("slate names"));
    }

    #[test]
    fn entries_replace_the_insert_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("copy_paster.html");
        let template = ManifestTemplate::from_source("<ul>\nREPLACED\n</ul>\n");

        write_manifest(&path, &template, 2, &names(&["Spot_A_30", "Spot_B_60"])).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(!written.contains("REPLACED"));
        assert_eq!(written.matches("<button").count(), 2);
        assert!(written.starts_with("<ul>\n"));
        assert!(written.ends_with("</ul>\n"));
    }

    #[test]
    fn each_entry_carries_the_name_twice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("copy_paster.html");
        let template = ManifestTemplate::from_source("X\n");

        write_manifest(&path, &template, 1, &names(&["Spot_A_30"])).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("data-clipboard-text=\"Spot_A_30\">Spot_A_30</button>"));
    }

    #[test]
    fn short_templates_emit_no_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("copy_paster.html");
        let template = ManifestTemplate::from_source("only line\n");

        write_manifest(&path, &template, 40, &names(&["Spot_A_30"])).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "only line\n");
    }

    #[test]
    fn loading_a_missing_template_reports_io() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.html");
        assert!(matches!(
            ManifestTemplate::load(&missing),
            Err(ManifestError::Io(_))
        ));
    }

    #[test]
    fn default_page_renders_buttons_at_the_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("copy_paster.html");
        let template = ManifestTemplate::built_in();

        write_manifest(
            &path,
            &template,
            DEFAULT_INSERT_LINE,
            &names(&["Spot_A_30", "Spot_B_60", "Spot_C_15"]),
        )
        .unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written.matches("<button").count(), 3);
        assert!(!written.contains("slate names"));
        assert!(written.contains("</html>"));
    }
}
