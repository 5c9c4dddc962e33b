//! Command-line interface for slater
//! This binary merges the rows of a CSV file into TTG slate templates and
//! writes one slate per row, plus an HTML page of the produced names.
//!
//! Usage:
//!   slater generate `<csv>` --template `<ttg>` [--output `<pattern>`]  - Write slates from CSV rows
//!   slater keywords `<ttg>`                                        - List a template's keyword slots

use clap::{Arg, ArgAction, Command};
use slater_config::SlaterConfig;
use slater_core::message::StdoutSink;
use slater_core::overwrite::{OverwriteChoice, OverwritePrompt};
use slater_core::project::{EnvProject, ProjectSource, StaticProject};
use slater_core::run::{generate, RunConfig};
use slater_core::ttg::template::TtgTemplate;
use std::io::{self, BufRead, Write};
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = Command::new("slater")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Stamp TTG slates from CSV data")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("generate")
                .about("Write one slate per CSV data row")
                .arg(
                    Arg::new("csv")
                        .help("CSV file of slate data; the header row names the columns")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("template")
                        .long("template")
                        .short('t')
                        .help("TTG template to merge each row into"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output path pattern; <Name>, <2> and <> tokens reference CSV cells"),
                )
                .arg(
                    Arg::new("html-template")
                        .long("html-template")
                        .help("HTML page template for the name manifest (built-in page when omitted)"),
                )
                .arg(
                    Arg::new("row-header")
                        .long("row-header")
                        .value_parser(clap::value_parser!(usize))
                        .help("1-based row holding the column names"),
                )
                .arg(
                    Arg::new("rows-include")
                        .long("rows-include")
                        .help("Rows to process, e.g. '1,3-17,87'"),
                )
                .arg(
                    Arg::new("rows-exclude")
                        .long("rows-exclude")
                        .help("Rows to drop, e.g. '1,3-17,87'"),
                )
                .arg(
                    Arg::new("include")
                        .long("include")
                        .value_delimiter(',')
                        .help("Globs a resolved output path must match"),
                )
                .arg(
                    Arg::new("exclude")
                        .long("exclude")
                        .value_delimiter(',')
                        .help("Globs that drop a resolved output path"),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .action(ArgAction::SetTrue)
                        .help("Overwrite existing files without asking"),
                )
                .arg(
                    Arg::new("skip-existing")
                        .long("skip-existing")
                        .action(ArgAction::SetTrue)
                        .help("Keep existing files without asking"),
                )
                .arg(
                    Arg::new("no-html")
                        .long("no-html")
                        .action(ArgAction::SetTrue)
                        .help("Skip the HTML name manifest"),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Go through every motion except writing files"),
                )
                .arg(
                    Arg::new("project")
                        .long("project")
                        .help("Project anchoring relative output patterns (falls back to $SLATER_PROJECT)"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Configuration file layered over the built-in defaults"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the produced paths as a JSON array"),
                ),
        )
        .subcommand(
            Command::new("keywords")
                .about("List the keyword slots in a TTG template")
                .arg(
                    Arg::new("template")
                        .help("Path to the TTG template")
                        .required(true)
                        .index(1),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("generate", generate_matches)) => {
            handle_generate_command(generate_matches);
        }
        Some(("keywords", keywords_matches)) => {
            let path = keywords_matches.get_one::<String>("template").unwrap();
            handle_keywords_command(path);
        }
        _ => unreachable!(),
    }
}

/// Handle the generate command
fn handle_generate_command(matches: &clap::ArgMatches) {
    let settings = load_settings(matches.get_one::<String>("config"));
    let csv = matches.get_one::<String>("csv").unwrap();
    let pattern = matches
        .get_one::<String>("output")
        .cloned()
        .unwrap_or_else(|| settings.output.pattern.clone());
    let output = anchor_pattern(&pattern, matches.get_one::<String>("project"), &settings);
    log::debug!("effective output pattern: {}", output);

    let mut config = RunConfig::new(csv, output)
        .with_row_header(
            matches
                .get_one::<usize>("row-header")
                .copied()
                .unwrap_or(settings.rows.header),
        )
        .with_manifest_filename(settings.manifest.filename.clone())
        .with_manifest_insert_line(settings.manifest.insert_line)
        .with_force_overwrite(matches.get_flag("force"))
        .with_skip_existing(matches.get_flag("skip-existing"))
        .with_html(!matches.get_flag("no-html"))
        .with_dry_run(matches.get_flag("dry-run"));
    if let Some(path) = matches.get_one::<String>("template") {
        config = config.with_template(path);
    }
    if let Some(path) = matches.get_one::<String>("html-template") {
        config = config.with_html_template(path);
    }
    if let Some(notation) = matches.get_one::<String>("rows-include") {
        config = config.with_row_include(notation.clone());
    }
    if let Some(notation) = matches.get_one::<String>("rows-exclude") {
        config = config.with_row_exclude(notation.clone());
    }
    if let Some(globs) = matches.get_many::<String>("include") {
        config = config.with_filter_include(trimmed(globs));
    }
    if let Some(globs) = matches.get_many::<String>("exclude") {
        config = config.with_filter_exclude(trimmed(globs));
    }

    let sink = StdoutSink;
    let prompt = StdinPrompt;
    let result = generate(config, &sink, &prompt).unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    if matches.get_flag("json") {
        let paths: Vec<String> = result
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        let formatted = serde_json::to_string_pretty(&paths).unwrap_or_else(|err| {
            eprintln!("Error formatting paths: {}", err);
            std::process::exit(1);
        });
        println!("{}", formatted);
    }
}

/// Handle the keywords command
fn handle_keywords_command(path: &str) {
    let template = TtgTemplate::load(Path::new(path)).unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });
    if !template.has_keywords() {
        println!("No keywords in {}", path);
        return;
    }
    for (line, keyword) in template.keywords() {
        println!("line {:>4}  <{}>", line, keyword);
    }
}

fn load_settings(user_file: Option<&String>) -> SlaterConfig {
    let mut loader = slater_config::Loader::new();
    if let Some(path) = user_file {
        loader = loader.with_file(path);
    }
    loader.build().unwrap_or_else(|err| {
        eprintln!("configuration error: {}", err);
        std::process::exit(1);
    })
}

/// Anchor a relative output pattern at `<setups_root>/<project>/text/flame`,
/// the text-setups directory of the host project, when a project is known.
/// Absolute patterns and project-less runs pass through untouched.
fn anchor_pattern(pattern: &str, project_flag: Option<&String>, settings: &SlaterConfig) -> String {
    if Path::new(pattern).is_absolute() {
        return pattern.to_string();
    }
    let project = match project_flag {
        Some(name) => StaticProject(name.clone()).project_name(),
        None => EnvProject.project_name(),
    };
    match project {
        Some(name) => Path::new(&settings.project.setups_root)
            .join(name)
            .join("text")
            .join("flame")
            .join(pattern)
            .display()
            .to_string(),
        None => pattern.to_string(),
    }
}

fn trimmed(globs: clap::parser::ValuesRef<'_, String>) -> Vec<String> {
    globs.map(|glob| glob.trim().to_string()).collect()
}

/// Interactive overwrite question on stdin, one of `y`, `n`, `Y`, `N`.
/// Anything else re-asks; end of input keeps the file.
struct StdinPrompt;

impl OverwritePrompt for StdinPrompt {
    fn ask(&self, path: &Path) -> OverwriteChoice {
        let mut input = String::new();
        loop {
            print!(
                "Overwrite {}? [y]es / [n]o / [Y]es to all / [N]o to all: ",
                path.display()
            );
            io::stdout().flush().ok();
            input.clear();
            match io::stdin().lock().read_line(&mut input) {
                Ok(0) | Err(_) => return OverwriteChoice::No,
                Ok(_) => {}
            }
            match input.trim() {
                "y" => return OverwriteChoice::Yes,
                "n" => return OverwriteChoice::No,
                "Y" => return OverwriteChoice::YesAll,
                "N" => return OverwriteChoice::NoAll,
                _ => continue,
            }
        }
    }
}
