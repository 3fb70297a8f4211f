use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use hexword_ecs::Board;
use hexword_protocol::Level;
use hexword_solver::{EngineConfig, NullEvents, RecomputeReport, RuleEngine, RuleSet};
use rkyv::ser::{serializers::AllocSerializer, Serializer};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Compiles hex word levels and inspects their rules")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a text layout to an rkyv binary level
    Compile {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Run the rule engine once and print what it found as JSON
    Rules {
        /// Text layout, or a compiled `.rkyv` level
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Engine settings as JSON
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct RulesReport<'a> {
    width: u32,
    height: u32,
    #[serde(flatten)]
    recompute: RecomputeReport,
    phrases: Vec<String>,
    rules: &'a RuleSet,
    i_entities: usize,
    goal_entities: usize,
    send_entities: usize,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Compile { input, output } => compile(&input, &output),
        Command::Rules { input, config } => rules(&input, config.as_deref()),
    }
}

fn compile(input: &Path, output: &Path) -> anyhow::Result<()> {
    let text = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let level = hexword_parser::parse_level(&text).with_context(|| format!("parsing {}", input.display()))?;
    tracing::info!(width = level.width, height = level.height, tiles = level.tiles.len(), "level parsed");

    let mut serializer = AllocSerializer::<256>::default();
    serializer
        .serialize_value(&level)
        .map_err(|err| anyhow!("serializing level: {err:?}"))?;
    let bytes = serializer.into_serializer().into_inner();

    fs::write(output, &bytes).with_context(|| format!("writing {}", output.display()))?;
    tracing::info!(bytes = bytes.len(), path = %output.display(), "level written");
    Ok(())
}

fn load_level(path: &Path) -> anyhow::Result<Level> {
    if path.extension().is_some_and(|ext| ext == "rkyv") {
        let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let mut bytes = rkyv::AlignedVec::with_capacity(raw.len());
        bytes.extend_from_slice(&raw);
        return rkyv::from_bytes::<Level>(&bytes)
            .map_err(|err| anyhow!("decoding {}: {err:?}", path.display()));
    }
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    hexword_parser::parse_level(&text).with_context(|| format!("parsing {}", path.display()))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: EngineConfig = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn rules(input: &Path, config: Option<&Path>) -> anyhow::Result<()> {
    let level = load_level(input)?;
    let mut board = Board::from_level(&level)?;
    let mut engine = RuleEngine::new(load_config(config)?);

    let recompute = engine.recompute(&mut board, &mut NullEvents);
    let report = RulesReport {
        width: board.width(),
        height: board.height(),
        recompute,
        phrases: engine.phrases().iter().map(|p| p.phrase.to_string()).collect(),
        rules: engine.rules(),
        i_entities: engine.i_entities().len(),
        goal_entities: engine.goal_entities().len(),
        send_entities: engine.send_entities().len(),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
