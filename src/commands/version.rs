use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

use upkeep::version::{self, BuildInfo, VersionChange};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct VersionArgs {
    #[command(subcommand)]
    command: VersionCommand,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum BumpPart {
    Major,
    Minor,
    Patch,
}

impl BumpPart {
    fn as_str(&self) -> &'static str {
        match self {
            BumpPart::Major => "major",
            BumpPart::Minor => "minor",
            BumpPart::Patch => "patch",
        }
    }
}

#[derive(Subcommand)]
enum VersionCommand {
    /// Show the current project version
    Show {
        /// Project root (default: current directory)
        #[arg(long)]
        path: Option<String>,
    },
    /// Set the version directly (x.y.z)
    Set {
        /// New version (e.g., 1.2.3)
        new_version: String,

        /// Project root (default: current directory)
        #[arg(long)]
        path: Option<String>,
    },
    /// Increment the version (major, minor, patch)
    Bump {
        /// Version part to increment
        part: BumpPart,

        /// Project root (default: current directory)
        #[arg(long)]
        path: Option<String>,
    },
    /// Generate a build number and write build-info.json
    Build {
        /// Project root (default: current directory)
        #[arg(long)]
        path: Option<String>,
    },
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum VersionOutput {
    #[serde(rename = "version.show")]
    Show {
        version: String,
        project_files: Vec<String>,
    },
    #[serde(rename = "version.set")]
    Set {
        old_version: String,
        new_version: String,
    },
    #[serde(rename = "version.bump")]
    Bump {
        part: String,
        old_version: String,
        new_version: String,
    },
    #[serde(rename = "version.build")]
    Build { build: BuildInfo },
}

pub fn run(args: VersionArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<VersionOutput> {
    match args.command {
        VersionCommand::Show { path } => run_show(path.as_deref()),
        VersionCommand::Set { new_version, path } => run_set(&new_version, path.as_deref()),
        VersionCommand::Bump { part, path } => run_bump(part, path.as_deref()),
        VersionCommand::Build { path } => run_build(path.as_deref()),
    }
}

fn resolve_root(path: Option<&str>) -> upkeep::Result<PathBuf> {
    match path {
        Some(p) => Ok(PathBuf::from(p)),
        None => Ok(std::env::current_dir()?),
    }
}

fn run_show(path: Option<&str>) -> CmdResult<VersionOutput> {
    let root = resolve_root(path)?;
    let version = version::current_version(&root);
    let project_files = version::find_project_files(&root)
        .iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect();

    Ok((
        VersionOutput::Show {
            version,
            project_files,
        },
        0,
    ))
}

fn run_set(new_version: &str, path: Option<&str>) -> CmdResult<VersionOutput> {
    let root = resolve_root(path)?;
    let VersionChange {
        old_version,
        new_version,
    } = version::set_version(&root, new_version)?;

    Ok((
        VersionOutput::Set {
            old_version,
            new_version,
        },
        0,
    ))
}

fn run_bump(part: BumpPart, path: Option<&str>) -> CmdResult<VersionOutput> {
    let root = resolve_root(path)?;
    let change = version::bump_version(&root, part.as_str())?;

    Ok((
        VersionOutput::Bump {
            part: part.as_str().to_string(),
            old_version: change.old_version,
            new_version: change.new_version,
        },
        0,
    ))
}

fn run_build(path: Option<&str>) -> CmdResult<VersionOutput> {
    let root = resolve_root(path)?;
    let build = version::create_build_info(&root)?;

    Ok((VersionOutput::Build { build }, 0))
}
