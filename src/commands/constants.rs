use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use upkeep::constants::{self, CaseMapping, ConvertOptions, FileReport, SkippedFile};
use upkeep::log_status;

use crate::commands::CmdResult;

#[derive(Args)]
pub struct ConstantsArgs {
    #[command(subcommand)]
    command: ConstantsCommand,
}

#[derive(Subcommand)]
enum ConstantsCommand {
    /// Convert const identifiers to UPPER_SNAKE_CASE across a source tree
    Convert {
        /// Directory to scan (default: current directory)
        #[arg(long)]
        path: Option<String>,

        /// Source file extension to include
        #[arg(long, default_value = "cs")]
        ext: String,

        /// Skip writing .bak copies of modified files
        #[arg(long)]
        no_backup: bool,
    },
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum ConstantsOutput {
    #[serde(rename = "constants.convert")]
    Convert {
        root: String,
        extension: String,
        backup: bool,
        mappings: Vec<CaseMapping>,
        files_changed: usize,
        total_replacements: usize,
        reports: Vec<FileReport>,
        skipped: Vec<SkippedFile>,
    },
}

pub fn run(args: ConstantsArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ConstantsOutput> {
    match args.command {
        ConstantsCommand::Convert {
            path,
            ext,
            no_backup,
        } => run_convert(path.as_deref(), &ext, !no_backup),
    }
}

fn run_convert(path: Option<&str>, ext: &str, backup: bool) -> CmdResult<ConstantsOutput> {
    let root = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };

    let mut options = ConvertOptions::new(&root);
    options.extension = ext.to_string();
    options.backup = backup;

    let result = constants::convert(&options);

    log_status!(
        "constants",
        "Conversion complete: {} files changed, {} replacements, {} const declarations converted",
        result.files_changed,
        result.total_replacements,
        result.mappings.len()
    );

    Ok((
        ConstantsOutput::Convert {
            root: root.to_string_lossy().to_string(),
            extension: ext.to_string(),
            backup,
            mappings: result.mappings,
            files_changed: result.files_changed,
            total_replacements: result.total_replacements,
            reports: result.reports,
            skipped: result.skipped,
        },
        0,
    ))
}
