//! worldbible CLI entry point.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use worldbible_foundation::{ChapterId, ElementId, SnapshotId};
use worldbible_runtime::{Session, SessionConfig, document};
use worldbible_storage::World;
use worldbible_timeline::SnapshotRequest;

/// Depth used by `graph` when `--depth` is absent.
const DEFAULT_GRAPH_DEPTH: u32 = 2;

/// Exit code of `analyze` when error-severity conflicts were found.
const EXIT_CONFLICTS: u8 = 2;

enum Command {
    Init { name: String, description: String },
    Info,
    Analyze { apply: bool },
    Graph { root: Option<ElementId>, depth: u32 },
    Snapshots,
    Snapshot { request: SnapshotRequest },
    Restore { id: SnapshotId },
}

/// CLI configuration parsed from arguments.
struct CliConfig {
    verbosity: u8,
    world: PathBuf,
    command: Command,
}

enum Parsed {
    Help,
    Version,
    Run(CliConfig),
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> CliResult<ExitCode> {
    let config = match parse_args(args)? {
        Parsed::Help => {
            print_help();
            return Ok(ExitCode::SUCCESS);
        }
        Parsed::Version => {
            println!("worldbible {}", env!("CARGO_PKG_VERSION"));
            return Ok(ExitCode::SUCCESS);
        }
        Parsed::Run(config) => config,
    };

    init_tracing(config.verbosity);
    execute(config)
}

// =============================================================================
// Argument parsing
// =============================================================================

fn parse_args(args: Vec<String>) -> CliResult<Parsed> {
    let mut verbosity = 0u8;
    let mut positional = Vec::new();
    let mut apply = false;
    let mut root = None;
    let mut depth = DEFAULT_GRAPH_DEPTH;
    let mut chapter = None;
    let mut tags = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Parsed::Help),
            "-V" | "--version" => return Ok(Parsed::Version),
            "-v" | "--verbose" => verbosity = verbosity.saturating_add(1),
            "-vv" => verbosity = verbosity.saturating_add(2),
            "--apply" => apply = true,
            "--root" => root = Some(value_of(&mut args, "--root")?.parse::<ElementId>()?),
            "--depth" => {
                let value = value_of(&mut args, "--depth")?;
                depth = value
                    .parse()
                    .map_err(|_| format!("invalid --depth value: {value}"))?;
            }
            "--chapter" => {
                chapter = Some(value_of(&mut args, "--chapter")?.parse::<ChapterId>()?);
            }
            "--tag" => tags.push(value_of(&mut args, "--tag")?),
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(format!("unknown option: {flag}").into());
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let Some(name) = positional.next() else {
        return Ok(Parsed::Help);
    };
    let world = PathBuf::from(
        positional
            .next()
            .ok_or_else(|| format!("{name} requires a world file"))?,
    );

    let command = match name.as_str() {
        "init" => Command::Init {
            name: positional.next().ok_or("init requires a world name")?,
            description: positional.next().unwrap_or_default(),
        },
        "info" => Command::Info,
        "analyze" => Command::Analyze { apply },
        "graph" => Command::Graph { root, depth },
        "snapshots" => Command::Snapshots,
        "snapshot" => {
            let description = positional.next().ok_or("snapshot requires a description")?;
            let mut request = SnapshotRequest::new(description);
            if let Some(chapter) = chapter {
                request = request.with_chapter(chapter);
            }
            for tag in tags {
                request = request.with_tag(tag);
            }
            Command::Snapshot { request }
        }
        "restore" => Command::Restore {
            id: positional
                .next()
                .ok_or("restore requires a snapshot id")?
                .parse()?,
        },
        other => return Err(format!("unknown command: {other}").into()),
    };

    if let Some(extra) = positional.next() {
        return Err(format!("unexpected argument: {extra}").into());
    }

    Ok(Parsed::Run(CliConfig {
        verbosity,
        world,
        command,
    }))
}

fn value_of(args: &mut impl Iterator<Item = String>, flag: &str) -> CliResult<String> {
    args.next()
        .ok_or_else(|| format!("{flag} requires a value").into())
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

// =============================================================================
// Commands
// =============================================================================

fn execute(config: CliConfig) -> CliResult<ExitCode> {
    let path = config.world;

    let command = match config.command {
        Command::Init { name, description } => {
            if path.exists() {
                return Err(format!("'{}' already exists", path.display()).into());
            }
            document::save_to_file(&World::new(name.as_str(), description), &path)?;
            println!("Created world \"{name}\" at {}", path.display());
            return Ok(ExitCode::SUCCESS);
        }
        command => command,
    };

    let mut session = Session::open(&path, SessionConfig::default().with_auto_analyze(false))?;

    match command {
        Command::Init { .. } => {}
        Command::Info => print_info(session.world()),
        Command::Analyze { apply } => {
            let analysis = session.analyze();
            let world = session.world();
            for candidate in &analysis.candidates {
                println!(
                    "[{}] {} -> {}: {}",
                    candidate.severity,
                    element_label(world, candidate.source_id),
                    element_label(world, candidate.target_id),
                    candidate.description
                );
            }
            for failure in &analysis.failures {
                eprintln!("\x1b[33mRule {} failed: {}\x1b[0m", failure.rule_id, failure.error);
            }
            let errors = analysis.errors().count();
            println!(
                "{} candidate(s), {errors} error(s), {} rule failure(s)",
                analysis.candidates.len(),
                analysis.failures.len()
            );

            if apply {
                let outcome = session.apply(analysis);
                println!(
                    "Recorded {} new conflict(s), {} already on record",
                    outcome.added.len(),
                    outcome.duplicates
                );
                session.save(&path)?;
            }
            if errors > 0 {
                return Ok(ExitCode::from(EXIT_CONFLICTS));
            }
        }
        Command::Graph { root, depth } => {
            let graph = session.graph(root, depth)?;
            println!("Nodes ({}):", graph.nodes.len());
            for node in &graph.nodes {
                println!(
                    "  {} {:<24} {:<10} depth={} weight={:.1}",
                    node.id, node.name, node.kind, node.depth, node.weight
                );
            }
            println!("Edges ({}):", graph.edges.len());
            for edge in &graph.edges {
                println!(
                    "  {} -[{}]-> {}",
                    element_label(session.world(), edge.source),
                    edge.rel_type,
                    element_label(session.world(), edge.target)
                );
            }
        }
        Command::Snapshots => {
            for snapshot in session.snapshots() {
                let tags = if snapshot.tags.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", snapshot.tags.join(", "))
                };
                println!(
                    "{} {} {}{tags}",
                    snapshot.id,
                    snapshot.captured_at.to_rfc3339(),
                    snapshot.description
                );
            }
        }
        Command::Snapshot { request } => {
            let id = session.create_snapshot(request)?;
            session.save(&path)?;
            println!("Created snapshot {id}");
        }
        Command::Restore { id } => {
            let backup = session.restore_snapshot(id)?;
            session.save(&path)?;
            println!("Restored snapshot {id}; previous state saved as {backup}");
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn element_label(world: &World, id: ElementId) -> String {
    world
        .element(id)
        .map_or_else(|| id.to_string(), |e| format!("{} ({})", e.name, e.kind))
}

fn print_info(world: &World) {
    let metadata = world.metadata();
    let settings = world.settings();
    println!("\x1b[1;36m=== {} ===\x1b[0m", metadata.name);
    if !metadata.description.is_empty() {
        println!("{}", metadata.description);
    }
    println!("Id:          {}", metadata.id);
    println!("Elements:    {}", metadata.elements_count);
    println!("Chapters:    {}", metadata.chapters_count);
    println!("Rules:       {}", world.rules().len());
    println!("Templates:   {}", world.brief_templates().len());
    println!("Snapshots:   {}/{}", world.snapshots().len(), settings.max_snapshots);
    println!("Unresolved:  {}", world.unresolved_conflicts().len());
    println!("Strictness:  {}", settings.conflict_detection_level);
    println!("Modified:    {}", metadata.modified_at.to_rfc3339());
}

fn print_help() {
    println!(
        "\x1b[1mworldbible\x1b[0m - World consistency and versioning

\x1b[1mUSAGE:\x1b[0m
    worldbible [OPTIONS] <COMMAND> <WORLD> [ARGS...]

\x1b[1mCOMMANDS:\x1b[0m
    init <WORLD> <NAME> [DESCRIPTION]   Create an empty world document
    info <WORLD>                        Summarize a world
    analyze <WORLD> [--apply]           Detect conflicts; --apply records them
    graph <WORLD> [--root ID] [--depth N]
                                        Print the relationship graph
    snapshots <WORLD>                   List snapshots, newest first
    snapshot <WORLD> <DESCRIPTION> [--chapter ID] [--tag TAG]...
                                        Capture a snapshot
    restore <WORLD> <SNAPSHOT-ID>       Restore a snapshot (backs up first)

\x1b[1mOPTIONS:\x1b[0m
    -h, --help         Print help information
    -V, --version      Print version information
    -v, --verbose      More log output on stderr (repeat for debug)

Files ending in .msgpack or .mpk are read and written as MessagePack;
everything else is JSON. RUST_LOG overrides the log filter. analyze exits
with status 2 when error-severity conflicts are found."
    );
}
