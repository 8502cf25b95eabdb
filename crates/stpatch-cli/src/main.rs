use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use stpatch_core::PatchConfig;
use stpatch_core::config::{
    DEFAULT_BASE_ROM, DEFAULT_HOOKS, DEFAULT_INPUT_SAVESTATE, DEFAULT_MAP,
    DEFAULT_OUTPUT_SAVESTATE, DEFAULT_ROM,
};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::translate::AddressSpace;

#[derive(Parser)]
#[command(name = "stpatch")]
#[command(version)]
#[command(about = "Inject a custom code segment and function hooks into an N64 savestate")]
#[command(
    long_about = "Takes an unmodified ROM and a newly built ROM that must only differ in the \
                  appended custom segment (Expansion Pak RAM), and injects the new segment and \
                  the hooks from the hook file into an input savestate to give a new output \
                  savestate. The input savestate is not modified."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Patch a savestate with the new ROM's custom segment and hooks
    Patch(PatchArgs),

    /// Check that the new ROM only differs from the base ROM past its end
    Verify(RomArgs),

    /// Parse the hook file, resolve it against the map file and list hooks
    Hooks(HookArgs),

    /// Convert an address between RDRAM, savestate and ROM coordinates
    Translate {
        /// Address or offset (hex, 0x prefix optional)
        address: String,

        /// Coordinate space of the given address
        #[arg(short, long, value_enum, default_value_t = AddressSpace::Memory)]
        from: AddressSpace,

        /// ROM entry point (hex), needed for ROM offsets
        #[arg(short, long)]
        entry: Option<String>,
    },
}

#[derive(Args)]
struct RomArgs {
    /// Unmodified ROM
    #[arg(short = 'b', long = "baserom", default_value = DEFAULT_BASE_ROM)]
    base_rom: PathBuf,

    /// Newly built ROM
    #[arg(short, long, default_value = DEFAULT_ROM)]
    rom: PathBuf,
}

#[derive(Args)]
struct HookArgs {
    /// Hook file: one "<target> <replacement> <max size>" entry per line
    #[arg(short = 'x', long, default_value = DEFAULT_HOOKS)]
    hooks: PathBuf,

    /// Linker map of the new ROM
    #[arg(short, long, default_value = DEFAULT_MAP)]
    map: PathBuf,
}

#[derive(Args)]
struct PatchArgs {
    #[command(flatten)]
    roms: RomArgs,

    /// Input savestate
    #[arg(short, long = "in", default_value = DEFAULT_INPUT_SAVESTATE)]
    input: PathBuf,

    /// Output savestate
    #[arg(short, long = "out", default_value = DEFAULT_OUTPUT_SAVESTATE)]
    output: PathBuf,

    #[command(flatten)]
    hook_files: HookArgs,

    /// Write a JSON report of the run
    #[arg(long, env = "STPATCH_REPORT")]
    report: Option<PathBuf>,
}

impl PatchArgs {
    fn into_config(self) -> PatchConfig {
        let builder = PatchConfig::builder()
            .base_rom(self.roms.base_rom)
            .rom(self.roms.rom)
            .input_savestate(self.input)
            .output_savestate(self.output)
            .hooks(self.hook_files.hooks)
            .map(self.hook_files.map);

        match self.report {
            Some(path) => builder.report(path),
            None => builder,
        }
        .build()
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("stpatch=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(parse_exit_code(&e));
        }
    };

    match cli.command {
        Command::Patch(args) => commands::patch::run(args.into_config()),
        Command::Verify(args) => commands::verify::run(&args.base_rom, &args.rom),
        Command::Hooks(args) => commands::hooks::run(&args.hooks, &args.map),
        Command::Translate {
            address,
            from,
            entry,
        } => commands::translate::run(&address, from, entry.as_deref()),
    }
}

/// Exit status for a command line that could not be parsed.
///
/// Usage errors exit with 1 like every other failure; help and version
/// output are not failures.
fn parse_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exit_code(args: &[&str]) -> Option<i32> {
        Cli::try_parse_from(args).err().map(|e| parse_exit_code(&e))
    }

    #[test]
    fn test_usage_errors_exit_with_one() {
        assert_eq!(exit_code(&["stpatch", "patch", "--bogus"]), Some(1));
        assert_eq!(exit_code(&["stpatch", "patch", "extra_arg"]), Some(1));
        assert_eq!(exit_code(&["stpatch"]), Some(1));
        assert_eq!(exit_code(&["stpatch", "translate", "0x1000", "-f", "cart"]), Some(1));
    }

    #[test]
    fn test_help_and_version_exit_with_zero() {
        assert_eq!(exit_code(&["stpatch", "--help"]), Some(0));
        assert_eq!(exit_code(&["stpatch", "patch", "--help"]), Some(0));
        assert_eq!(exit_code(&["stpatch", "--version"]), Some(0));
    }

    #[test]
    fn test_patch_defaults() {
        let cli = Cli::try_parse_from(["stpatch", "patch", "-o", "out.st"]).unwrap();
        let Command::Patch(args) = cli.command else {
            panic!("expected patch command");
        };
        let config = args.into_config();
        assert_eq!(config.output_savestate, PathBuf::from("out.st"));
        assert_eq!(config.base_rom, PathBuf::from(DEFAULT_BASE_ROM));
        assert_eq!(config.map, PathBuf::from(DEFAULT_MAP));
    }
}
