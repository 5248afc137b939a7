use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use campus_hud::{DebugTextHud, HudFrame, HudRenderer};
use campus_input::Action;
use campus_kernel::{InteractionEvent, Session, SessionConfig};
use campus_scene::SceneRegistry;
use campus_tools::SessionInspector;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod script;

use script::InputScript;

#[derive(Parser)]
#[command(name = "campus-cli", about = "Headless driver for the campus exploration core")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Scene registry file (.json, .yaml or .yml)
    #[arg(short, long)]
    scene: PathBuf,
    /// Tuning overrides (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Input script (YAML); without one the player stands still
    #[arg(long)]
    script: Option<PathBuf>,
    /// Stop after this many ticks
    #[arg(short, long)]
    ticks: Option<u64>,
    /// Fixed frame time in seconds
    #[arg(long, default_value = "0.016666668")]
    dt: f32,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Load and validate a scene file
    Validate {
        #[arg(short, long)]
        scene: PathBuf,
    },
    /// Run a session from an input script and print HUD frames and events
    Simulate {
        #[command(flatten)]
        run: RunArgs,
        /// Print a HUD line every N ticks (0 disables)
        #[arg(long, default_value = "30")]
        hud_every: u64,
    },
    /// Run a session, then rebuild it from its log and compare state hashes
    Replay {
        #[command(flatten)]
        run: RunArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Info => {
            println!("campus-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", campus_common::crate_info());
            println!("input: {}", campus_input::crate_info());
            println!("scene: {}", campus_scene::crate_info());
            println!("kernel: {}", campus_kernel::crate_info());
            println!("hud: {}", campus_hud::crate_info());
            println!("tools: {}", campus_tools::crate_info());
        }
        Commands::Validate { scene } => {
            let registry = load_scene(&scene)?;
            let counts = registry.counts();
            println!(
                "{}: OK ({} entities: {} items, {} NPCs ({} patrolling), {} objects)",
                scene.display(),
                registry.len(),
                counts.items,
                counts.npcs,
                counts.patrolling_npcs,
                counts.world_objects
            );
            let s = registry.spawn();
            println!("spawn: ({:.2}, {:.2}, {:.2})", s.x, s.y, s.z);
        }
        Commands::Simulate { run, hud_every } => {
            let (mut session, script) = open(&run)?;
            let hud = DebugTextHud::new().with_camera();
            let ran = script::run(&mut session, &script, run.dt, run.ticks, |s, out| {
                if hud_every > 0 && out.tick % hud_every == 0 {
                    println!("{}", hud.render(&HudFrame::capture(s)));
                }
                if let Some(event) = &out.event {
                    println!("{}", describe(out.tick, event));
                }
            });
            println!("Ran {ran} ticks");
            println!("{}", SessionInspector::summary(&session));
            for id in SessionInspector::list_entities(&session) {
                if let Some(info) = SessionInspector::inspect_entity(&session, &id) {
                    println!("  {info}");
                }
            }
        }
        Commands::Replay { run } => {
            let (mut session, script) = open(&run)?;
            let ran = script::run(&mut session, &script, run.dt, run.ticks, |_, _| {});
            let replayed = Session::replay(
                session.registry().clone(),
                session.config().clone(),
                session.events(),
            )?;
            let (a, b) = (session.state_hash(), replayed.state_hash());
            println!("Run:    ticks={ran} events={} hash={a:016x}", session.events().len());
            println!(
                "Replay: ticks={} events={} hash={b:016x}",
                replayed.tick(),
                replayed.events().len()
            );
            if a != b {
                bail!("replay mismatch");
            }
            println!("Match: OK");
        }
    }

    Ok(())
}

fn load_scene(path: &Path) -> anyhow::Result<SceneRegistry> {
    SceneRegistry::load(path).with_context(|| format!("loading scene {}", path.display()))
}

/// Build a session and its input script from command-line arguments.
fn open(args: &RunArgs) -> anyhow::Result<(Session, InputScript)> {
    if !args.dt.is_finite() || args.dt <= 0.0 {
        bail!("--dt must be positive, got {}", args.dt);
    }
    let registry = load_scene(&args.scene)?;
    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SessionConfig::default(),
    };
    let script = match &args.script {
        Some(path) => InputScript::load(path)?,
        None => InputScript::idle(10.0),
    };
    if args.config.is_none() {
        if let Some(label) = script.key_bindings().label_for(Action::Interact) {
            config.interaction.key_label = label;
        }
    }
    let session = Session::new(registry, config)?;
    Ok((session, script))
}

fn describe(tick: u64, event: &InteractionEvent) -> String {
    match event {
        InteractionEvent::Collect {
            entity,
            collectible_id,
        } => format!("#{tick} collect {collectible_id} (from {entity})"),
        InteractionEvent::Interact { kind, id } => {
            format!("#{tick} interact {} {id}", kind.name())
        }
        InteractionEvent::Dialogue { name, lines, .. } => {
            let mut s = format!("#{tick} dialogue with {name}");
            for line in lines {
                s.push_str(&format!("\n    \"{line}\""));
            }
            s
        }
    }
}
