//! Engine for stamping slates from the rows of a CSV table.
//!
//! A slate is a TTG text setup, the line-oriented format described in
//! [`ttg`]. A template carries keyword slots such as `<Title>`; one run
//! merges every data row of a table into the template and writes one slate
//! per row, named by an output-path pattern built from the same row:
//!
//! ```
//! use slater_core::{generate, DenyPrompt, RunConfig, StdoutSink};
//!
//! let config = RunConfig::new("spots.csv", "slates/<Title>_<Duration>.ttg")
//!     .with_template("slate_16x9.ttg");
//! let result = generate(config, &StdoutSink, &DenyPrompt)?;
//! println!("{} files", result.len());
//! # Ok::<(), slater_core::RunError>(())
//! ```
//!
//! Rows are filtered by number ([`rows`]) and by output-path glob, existing
//! files go through an overwrite policy ([`overwrite`]), and an HTML page
//! listing every produced name lands next to the slates ([`manifest`]).
//! Progress reporting and interactive questions are capabilities the caller
//! plugs in, so the engine itself never assumes a terminal.

pub mod fsops;
pub mod manifest;
pub mod message;
pub mod overwrite;
pub mod pathspec;
pub mod project;
pub mod rows;
pub mod run;
pub mod table;
pub mod testing;
pub mod ttg;

pub use message::{MemorySink, MessageSink, NullSink, StdoutSink};
pub use overwrite::{Decision, DenyPrompt, OverwriteChoice, OverwritePolicy, OverwritePrompt};
pub use run::{generate, RunConfig, RunError, RunResult, Runner};
