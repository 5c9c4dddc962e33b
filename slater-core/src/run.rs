//! The run orchestrator: drives every table row through filtering, path
//! resolution, overwrite arbitration and slate writing, then the manifest.

use crate::fsops;
use crate::manifest::{self, ManifestTemplate};
use crate::message::{plural, MessageSink};
use crate::overwrite::{Decision, OverwritePolicy, OverwritePrompt};
use crate::pathspec::PathPattern;
use crate::rows::{self, NotationError};
use crate::table::DataTable;
use crate::ttg::template::TtgTemplate;
use crate::ttg::writer;
use glob::Pattern;
use log::debug;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::PathBuf;

/// Configuration-level failure; the only error that crosses [`generate`].
/// Everything after startup is row-local and reported through the sink.
#[derive(Debug)]
pub enum RunError {
    /// Unusable output pattern or path filter.
    Config(String),
    /// Malformed row selection notation.
    Notation(NotationError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Config(msg) => write!(f, "configuration error: {}", msg),
            RunError::Notation(err) => write!(f, "configuration error: {}", err),
        }
    }
}

impl std::error::Error for RunError {}

impl From<NotationError> for RunError {
    fn from(err: NotationError) -> Self {
        RunError::Notation(err)
    }
}

/// Everything one run needs, assembled by the caller.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// The CSV file of slate data.
    pub csv_file: PathBuf,
    /// Output path pattern; may contain `<>` / `<2>` / `<Title>` tokens.
    pub output: String,
    /// TTG template to merge each row into. Without one, paths are resolved
    /// and reported but nothing is written.
    pub template_ttg: Option<PathBuf>,
    /// Manifest page template; the compiled-in page when unset.
    pub template_html: Option<PathBuf>,
    /// 1-based row holding the column names.
    pub row_header: usize,
    /// Row notation selecting the only rows to process.
    pub row_include: Option<String>,
    /// Row notation selecting rows to drop.
    pub row_exclude: Option<String>,
    /// Globs a resolved output path must match.
    pub filter_include: Vec<String>,
    /// Globs that drop a resolved output path.
    pub filter_exclude: Vec<String>,
    /// Overwrite existing files without asking.
    pub force_overwrite: bool,
    /// Keep existing files without asking.
    pub skip_existing: bool,
    /// Write the manifest page after the slates.
    pub html: bool,
    /// Go through every motion except writing.
    pub dry_run: bool,
    /// Manifest file name, placed in the common parent of the outputs.
    pub manifest_filename: String,
    /// 1-based manifest template line the name entries replace.
    pub manifest_insert_line: usize,
}

impl RunConfig {
    pub fn new(csv_file: impl Into<PathBuf>, output: impl Into<String>) -> Self {
        RunConfig {
            csv_file: csv_file.into(),
            output: output.into(),
            template_ttg: None,
            template_html: None,
            row_header: 1,
            row_include: None,
            row_exclude: None,
            filter_include: Vec::new(),
            filter_exclude: Vec::new(),
            force_overwrite: false,
            skip_existing: false,
            html: true,
            dry_run: false,
            manifest_filename: manifest::DEFAULT_FILENAME.to_string(),
            manifest_insert_line: manifest::DEFAULT_INSERT_LINE,
        }
    }

    pub fn with_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_ttg = Some(path.into());
        self
    }

    pub fn with_html_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_html = Some(path.into());
        self
    }

    pub fn with_row_header(mut self, row: usize) -> Self {
        self.row_header = row;
        self
    }

    pub fn with_row_include(mut self, notation: impl Into<String>) -> Self {
        self.row_include = Some(notation.into());
        self
    }

    pub fn with_row_exclude(mut self, notation: impl Into<String>) -> Self {
        self.row_exclude = Some(notation.into());
        self
    }

    pub fn with_filter_include(mut self, globs: Vec<String>) -> Self {
        self.filter_include = globs;
        self
    }

    pub fn with_filter_exclude(mut self, globs: Vec<String>) -> Self {
        self.filter_exclude = globs;
        self
    }

    pub fn with_force_overwrite(mut self, yes: bool) -> Self {
        self.force_overwrite = yes;
        self
    }

    pub fn with_skip_existing(mut self, yes: bool) -> Self {
        self.skip_existing = yes;
        self
    }

    pub fn with_html(mut self, yes: bool) -> Self {
        self.html = yes;
        self
    }

    pub fn with_dry_run(mut self, yes: bool) -> Self {
        self.dry_run = yes;
        self
    }

    pub fn with_manifest_filename(mut self, filename: impl Into<String>) -> Self {
        self.manifest_filename = filename.into();
        self
    }

    pub fn with_manifest_insert_line(mut self, line: usize) -> Self {
        self.manifest_insert_line = line;
        self
    }
}

/// Ordered paths a run produced: slates in row order, then the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    pub paths: Vec<PathBuf>,
}

impl RunResult {
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }
}

/// Drives one run. Owns the overwrite policy; the sink and prompt are
/// borrowed capabilities.
pub struct Runner<'a> {
    config: RunConfig,
    pattern: PathPattern,
    include_rows: BTreeSet<usize>,
    exclude_rows: BTreeSet<usize>,
    include_globs: Vec<Pattern>,
    exclude_globs: Vec<Pattern>,
    policy: OverwritePolicy,
    sink: &'a dyn MessageSink,
    prompt: &'a dyn OverwritePrompt,
}

impl<'a> Runner<'a> {
    /// Validate the configuration and build a runner.
    ///
    /// Everything fatal happens here: pattern parsing, row notation
    /// expansion, glob compilation. After this point failures are row-local.
    pub fn new(
        config: RunConfig,
        sink: &'a dyn MessageSink,
        prompt: &'a dyn OverwritePrompt,
    ) -> Result<Self, RunError> {
        let pattern = PathPattern::parse(&config.output)
            .map_err(|err| RunError::Config(err.to_string()))?;
        let include_rows = match &config.row_include {
            Some(notation) => rows::expand(notation)?,
            None => BTreeSet::new(),
        };
        let exclude_rows = match &config.row_exclude {
            Some(notation) => rows::expand(notation)?,
            None => BTreeSet::new(),
        };
        let include_globs = compile_globs(&config.filter_include)?;
        let exclude_globs = compile_globs(&config.filter_exclude)?;
        let policy = OverwritePolicy::new(config.force_overwrite, config.skip_existing);
        Ok(Runner {
            config,
            pattern,
            include_rows,
            exclude_rows,
            include_globs,
            exclude_globs,
            policy,
            sink,
            prompt,
        })
    }

    /// Run every row, then the manifest.
    ///
    /// An unreadable table or TTG template is reported and leaves the result
    /// empty; from there on, problems only ever skip their own row.
    pub fn run(&mut self) -> RunResult {
        let mut result = RunResult::default();

        let table = match DataTable::load(&self.config.csv_file) {
            Ok(table) => table,
            Err(err) => {
                self.sink.send(&err.to_string());
                return result;
            }
        };

        let template = match &self.config.template_ttg {
            Some(path) => match TtgTemplate::load(path) {
                Ok(template) => Some(template),
                Err(err) => {
                    self.sink.send(&err.to_string());
                    return result;
                }
            },
            None => None,
        };

        if let (Some(template), Some(path)) = (&template, &self.config.template_ttg) {
            self.sink.send(&format!(
                "Found {} in {}",
                plural("keyword", template.keywords().len()),
                path.display()
            ));
            if template.has_keywords() {
                self.sink.send(&template.keyword_names().join(", "));
            }
        }

        if !table.is_empty() {
            self.sink.send(&format!(
                "Found {} in {}",
                plural("row", table.len()),
                self.config.csv_file.display()
            ));
        }

        for row_number in 1..=table.len() {
            if let Some(path) = self.process_row(&table, template.as_ref(), row_number) {
                result.paths.push(path);
            }
        }

        self.write_manifest_page(&mut result);
        self.sink.send("Done!");
        result
    }

    /// The per-row step: filters, path resolution, overwrite arbitration,
    /// slate writing. Returns the produced output path, or the validated one
    /// for dry and template-less runs, or `None` for a skip.
    pub fn process_row(
        &mut self,
        table: &DataTable,
        template: Option<&TtgTemplate>,
        row_number: usize,
    ) -> Option<PathBuf> {
        let row = table.row(row_number)?;

        if row.iter().all(|cell| cell.is_empty()) {
            self.report_row(row_number, "Skipping - Empty row");
            return None;
        }
        if row_number == self.config.row_header {
            self.report_row(row_number, "Skipping - Header row");
            return None;
        }
        if self.exclude_rows.contains(&row_number) {
            self.report_row(row_number, "Skipping - Row excluded");
            return None;
        }
        if !self.include_rows.is_empty() && !self.include_rows.contains(&row_number) {
            self.report_row(row_number, "Skipping - Row not included");
            return None;
        }

        let header = table.row(self.config.row_header).unwrap_or(&[]);
        let resolved = match self.pattern.resolve(header, row) {
            Ok(resolved) => resolved,
            Err(err) => {
                debug!("row {}: {}", row_number, err);
                self.report_row(row_number, "Skipping - Could not assemble output path.");
                return None;
            }
        };

        if self.exclude_globs.iter().any(|glob| glob.matches(&resolved)) {
            self.report_row(
                row_number,
                &format!("Skipping - {} matches exclude filter", resolved),
            );
            return None;
        }
        if !self.include_globs.is_empty()
            && !self.include_globs.iter().any(|glob| glob.matches(&resolved))
        {
            self.report_row(
                row_number,
                &format!("Skipping - {} does not match include filter", resolved),
            );
            return None;
        }

        let filepath = PathBuf::from(&resolved);
        self.report_row(
            row_number,
            &format!("Proceeding with {}", fsops::file_stem(&filepath)),
        );

        if let Some(template) = template.filter(|t| t.has_keywords()) {
            let exists = filepath.is_file();
            if exists {
                self.report_row(row_number, &format!("Warning! {} already exists!", resolved));
            }
            if self.policy.decide(&filepath, exists, self.prompt) == Decision::Skip {
                self.report_row(row_number, &format!("Skipping {}", resolved));
                return None;
            }

            if !self.config.dry_run {
                self.report_row(row_number, &format!("Writing out {}", resolved));
                let values: HashMap<String, String> = header
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect();
                if let Err(err) = fsops::ensure_parent_dir(&filepath)
                    .and_then(|_| writer::write_slate(&filepath, template, &values))
                {
                    self.report_row(
                        row_number,
                        &format!("Skipping! Cannot write to this path. ({})", err),
                    );
                    return None;
                }
            }
        }

        Some(filepath)
    }

    fn write_manifest_page(&self, result: &mut RunResult) {
        if self.config.template_ttg.is_none() || !self.config.html || self.config.dry_run {
            return;
        }
        if result.is_empty() {
            return;
        }
        let template = match &self.config.template_html {
            Some(path) => match ManifestTemplate::load(path) {
                Ok(template) => template,
                Err(err) => {
                    self.sink.send(&err.to_string());
                    self.sink.send(&format!("Please check {} exists.", path.display()));
                    return;
                }
            },
            None => ManifestTemplate::built_in(),
        };
        let destination = match fsops::common_parent(&result.paths) {
            Some(dir) => dir.join(&self.config.manifest_filename),
            None => return,
        };
        let names: Vec<String> = result.iter().map(|path| fsops::file_stem(path)).collect();
        self.sink.send(&format!("Writing out {}", destination.display()));
        let written = fsops::ensure_parent_dir(&destination).and_then(|_| {
            manifest::write_manifest(
                &destination,
                &template,
                self.config.manifest_insert_line,
                &names,
            )
        });
        match written {
            Ok(()) => result.paths.push(destination),
            Err(err) => self.sink.send(&format!("Skipping manifest: {}", err)),
        }
    }

    fn report_row(&self, row_number: usize, message: &str) {
        self.sink.send(&format!("Row {:02} - {}", row_number, message));
    }
}

fn compile_globs(globs: &[String]) -> Result<Vec<Pattern>, RunError> {
    globs
        .iter()
        .map(|glob| {
            Pattern::new(glob)
                .map_err(|err| RunError::Config(format!("bad path filter {:?}: {}", glob, err)))
        })
        .collect()
}

/// Run the engine end to end with the supplied capabilities.
pub fn generate(
    config: RunConfig,
    sink: &dyn MessageSink,
    prompt: &dyn OverwritePrompt,
) -> Result<RunResult, RunError> {
    Ok(Runner::new(config, sink, prompt)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{MemorySink, NullSink};
    use crate::overwrite::DenyPrompt;
    use crate::testing;
    use std::fs;

    fn table(rows: &[&[&str]]) -> DataTable {
        DataTable::from_rows(
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }

    fn spot_table() -> DataTable {
        table(&[
            &["Title", "Duration"],
            &["Spot A", "30"],
            &["Spot B", "60"],
        ])
    }

    #[test]
    fn empty_output_pattern_is_fatal() {
        let sink = NullSink;
        let prompt = DenyPrompt;
        let config = RunConfig::new("data.csv", "");
        assert!(matches!(
            Runner::new(config, &sink, &prompt),
            Err(RunError::Config(_))
        ));
    }

    #[test]
    fn bad_row_notation_is_fatal() {
        let sink = NullSink;
        let prompt = DenyPrompt;
        let config = RunConfig::new("data.csv", "<Title>.ttg").with_row_include("1,x");
        assert!(matches!(
            Runner::new(config, &sink, &prompt),
            Err(RunError::Notation(_))
        ));
    }

    #[test]
    fn bad_path_filter_is_fatal() {
        let sink = NullSink;
        let prompt = DenyPrompt;
        let config = RunConfig::new("data.csv", "<Title>.ttg")
            .with_filter_include(vec!["[".to_string()]);
        assert!(matches!(
            Runner::new(config, &sink, &prompt),
            Err(RunError::Config(_))
        ));
    }

    #[test]
    fn empty_rows_skip_before_every_other_rule() {
        let sink = MemorySink::new();
        let prompt = DenyPrompt;
        let config = RunConfig::new("data.csv", "<Title>.ttg").with_row_exclude("2");
        let mut runner = Runner::new(config, &sink, &prompt).unwrap();
        let rows = table(&[&["Title"], &["", ""]]);
        assert!(runner.process_row(&rows, None, 2).is_none());
        assert!(sink.contains("Row 02 - Skipping - Empty row"));
    }

    #[test]
    fn header_row_skips_even_when_included() {
        let sink = MemorySink::new();
        let prompt = DenyPrompt;
        let config = RunConfig::new("data.csv", "<Title>.ttg").with_row_include("1");
        let mut runner = Runner::new(config, &sink, &prompt).unwrap();
        assert!(runner.process_row(&spot_table(), None, 1).is_none());
        assert!(sink.contains("Row 01 - Skipping - Header row"));
    }

    #[test]
    fn excluded_rows_win_over_included() {
        let sink = MemorySink::new();
        let prompt = DenyPrompt;
        let config = RunConfig::new("data.csv", "<Title>.ttg")
            .with_row_include("2")
            .with_row_exclude("2");
        let mut runner = Runner::new(config, &sink, &prompt).unwrap();
        assert!(runner.process_row(&spot_table(), None, 2).is_none());
        assert!(sink.contains("Row 02 - Skipping - Row excluded"));
    }

    #[test]
    fn include_set_skips_nonmembers() {
        let sink = MemorySink::new();
        let prompt = DenyPrompt;
        let config = RunConfig::new("data.csv", "<Title>.ttg").with_row_include("3");
        let mut runner = Runner::new(config, &sink, &prompt).unwrap();
        assert!(runner.process_row(&spot_table(), None, 2).is_none());
        assert!(sink.contains("Row 02 - Skipping - Row not included"));
    }

    #[test]
    fn unresolved_tokens_skip_the_row() {
        let sink = MemorySink::new();
        let prompt = DenyPrompt;
        let config = RunConfig::new("data.csv", "<Title>_<Duration>.ttg");
        let mut runner = Runner::new(config, &sink, &prompt).unwrap();
        let rows = table(&[&["Title", "Duration"], &["Spot A", ""]]);
        assert!(runner.process_row(&rows, None, 2).is_none());
        assert!(sink.contains("Row 02 - Skipping - Could not assemble output path."));
    }

    #[test]
    fn exclude_globs_drop_matching_paths() {
        let sink = MemorySink::new();
        let prompt = DenyPrompt;
        let config = RunConfig::new("data.csv", "<Title>.ttg")
            .with_filter_exclude(vec!["Spot_A*".to_string()]);
        let mut runner = Runner::new(config, &sink, &prompt).unwrap();
        assert!(runner.process_row(&spot_table(), None, 2).is_none());
        assert!(sink.contains("Skipping - Spot_A.ttg matches exclude filter"));
        // the other row still passes
        assert_eq!(
            runner.process_row(&spot_table(), None, 3),
            Some(PathBuf::from("Spot_B.ttg"))
        );
    }

    #[test]
    fn include_globs_must_match() {
        let sink = MemorySink::new();
        let prompt = DenyPrompt;
        let config = RunConfig::new("data.csv", "<Title>.ttg")
            .with_filter_include(vec!["Spot_B*".to_string()]);
        let mut runner = Runner::new(config, &sink, &prompt).unwrap();
        assert!(runner.process_row(&spot_table(), None, 2).is_none());
        assert!(sink.contains("Skipping - Spot_A.ttg does not match include filter"));
    }

    #[test]
    fn template_less_rows_return_the_validated_path() {
        let sink = MemorySink::new();
        let prompt = DenyPrompt;
        let config = RunConfig::new("data.csv", "<Title>_<Duration>.ttg");
        let mut runner = Runner::new(config, &sink, &prompt).unwrap();
        assert_eq!(
            runner.process_row(&spot_table(), None, 2),
            Some(PathBuf::from("Spot_A_30.ttg"))
        );
        assert!(sink.contains("Row 02 - Proceeding with Spot_A_30"));
    }

    #[test]
    fn keywordless_templates_validate_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let sink = NullSink;
        let prompt = DenyPrompt;
        let pattern = dir.path().join("<Title>.ttg").display().to_string();
        let config = RunConfig::new("data.csv", pattern);
        let mut runner = Runner::new(config, &sink, &prompt).unwrap();
        let template = TtgTemplate::from_lines(vec!["Module Text".to_string()]);
        let produced = runner.process_row(&spot_table(), Some(&template), 2).unwrap();
        assert!(!produced.exists());
    }

    #[test]
    fn dry_runs_consult_the_arbiter_but_never_write() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("Spot_A.ttg");
        fs::write(&existing, "untouched").unwrap();
        let sink = MemorySink::new();
        let prompt = DenyPrompt;
        let pattern = dir.path().join("<Title>.ttg").display().to_string();
        let config = RunConfig::new("data.csv", pattern).with_dry_run(true);
        let mut runner = Runner::new(config, &sink, &prompt).unwrap();
        let template = TtgTemplate::from_lines(testing::one_slot_template());

        // the prompt denies, so the existing file is skipped even dry
        assert!(runner.process_row(&spot_table(), Some(&template), 2).is_none());
        assert!(sink.contains("already exists!"));

        // the missing file is "produced" without touching the disk
        let produced = runner.process_row(&spot_table(), Some(&template), 3).unwrap();
        assert!(!produced.exists());
        assert_eq!(fs::read_to_string(&existing).unwrap(), "untouched");
    }

    #[test]
    fn writes_go_through_when_the_template_has_keywords() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MemorySink::new();
        let prompt = DenyPrompt;
        let pattern = dir.path().join("out/<Title>.ttg").display().to_string();
        let config = RunConfig::new("data.csv", pattern);
        let mut runner = Runner::new(config, &sink, &prompt).unwrap();
        let template = TtgTemplate::from_lines(testing::one_slot_template());

        let produced = runner.process_row(&spot_table(), Some(&template), 2).unwrap();
        assert!(produced.is_file());
        let written = fs::read_to_string(&produced).unwrap();
        assert!(written.contains("Text 83 112 111 116 32 65"));
        assert!(sink.contains("Writing out"));
    }
}
