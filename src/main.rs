use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{constants, version, GlobalArgs};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "upkeep")]
#[command(version = VERSION)]
#[command(about = "CLI for codebase maintenance: constant-case conversion and version management")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert constant identifiers to UPPER_SNAKE_CASE
    Constants(constants::ConstantsArgs),
    /// Read and write the project version
    Version(version::VersionArgs),
}

fn exit_code_to_u8(code: i32) -> u8 {
    code.clamp(0, 255) as u8
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {};

    let (json_result, exit_code) = match cli.command {
        Commands::Constants(args) => output::map_cmd_result_to_json(constants::run(args, &global)),
        Commands::Version(args) => output::map_cmd_result_to_json(version::run(args, &global)),
    };

    output::print_json_result(json_result);
    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}
