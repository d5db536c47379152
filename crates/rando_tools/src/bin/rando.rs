#![forbid(unsafe_code)]

//! Build a generator command line from a settings session.
//!
//! Usage: `rando [--catalog FILE] [--manifest FILE] [--sprites DIR] [--asset-option KEY] [--players N]
//! [--set KEY=VALUE]... [--player IDX:KEY=VALUE]... [--generator PROGRAM]
//! [--dry-run] [--json] [--list-options] INPUT`

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use rando_contracts::OptionSchema;
use rando_engines::asset_catalog::{augment_from_provider, ManifestAssetProvider};
use rando_engines::builtin_catalog::{builtin_catalog, ASSET_OPTION_KEY};
use rando_engines::multiworld::build_argument_vector;
use rando_engines::session::Session;
use rando_os::generate::{GenerateWiring, GenerateWiringConfig};
use rando_os::process_generator::ProcessGenerator;
use rando_tools::config::LauncherConfig;
use rando_tools::session_cli::{apply_cli, describe_schema, render_arguments};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "rando")]
#[command(about = "Assemble randomizer settings into a generator command line")]
struct Args {
    /// Input ROM path, passed through as the final argument
    input: Option<String>,

    /// Option catalog as JSON (defaults to the built-in catalog)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Asset manifest listing the bundled graphics
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Directory of custom sprite sheets
    #[arg(long)]
    sprites: Option<PathBuf>,

    /// Asset-choice option that receives discovered graphics
    #[arg(long = "asset-option", default_value = ASSET_OPTION_KEY)]
    asset_option: String,

    /// Number of participants
    #[arg(long)]
    players: Option<u32>,

    /// Global or shared setting, KEY=VALUE
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Per-participant override, IDX:KEY=VALUE
    #[arg(long = "player", value_name = "IDX:KEY=VALUE")]
    player: Vec<String>,

    /// Generator program to run with the assembled arguments
    #[arg(long)]
    generator: Option<PathBuf>,

    /// Print the arguments instead of running the generator
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Print arguments as a JSON array
    #[arg(long)]
    json: bool,

    /// Print the option catalog and exit
    #[arg(long = "list-options")]
    list_options: bool,
}

fn main() {
    rando_tools::init_logging();

    if let Err(err) = run(Args::parse()) {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

fn run(args: Args) -> Result<(), String> {
    let config = LauncherConfig::default_local().with_overrides(
        args.catalog.clone(),
        args.manifest.clone(),
        args.sprites.clone(),
        args.generator.clone(),
    );

    let mut schema = load_catalog(config.catalog_path.as_deref())?;
    if config.has_asset_sources() {
        let provider =
            ManifestAssetProvider::new(config.asset_manifest.clone(), config.sprites_dir.clone());
        let report = augment_from_provider(&mut schema, &args.asset_option, &provider)
            .map_err(|e| format!("failed to load assets: {e}"))?;
        info!(
            builtin = report.builtin_count,
            custom = report.custom_count,
            "asset choices loaded"
        );
    }

    if args.list_options {
        print!("{}", describe_schema(&schema)?);
        return Ok(());
    }

    let input = args
        .input
        .as_deref()
        .ok_or_else(|| "missing INPUT path. see rando --help".to_string())?;

    let mut session = Session::new(schema).map_err(|e| format!("invalid catalog: {e}"))?;
    apply_cli(&mut session, args.players, &args.set, &args.player)?;

    match config.generator.filter(|_| !args.dry_run) {
        Some(program) => {
            let wiring =
                GenerateWiring::new(GenerateWiringConfig::live(), ProcessGenerator::new(program));
            wiring.run(&session, input).map_err(|e| e.to_string())?;
        }
        None => {
            let argv = build_argument_vector(&session, input).map_err(|e| e.to_string())?;
            println!("{}", render_arguments(&argv, args.json)?);
        }
    }
    Ok(())
}

fn load_catalog(path: Option<&Path>) -> Result<OptionSchema, String> {
    let Some(path) = path else {
        return builtin_catalog().map_err(|e| e.to_string());
    };
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("failed to read catalog {}: {e}", path.display()))?;
    OptionSchema::from_json_str(&raw)
        .map_err(|e| format!("invalid catalog {}: {e}", path.display()))
}
