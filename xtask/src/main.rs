use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for campus-explore")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Validate the demo scene, then simulate and replay the demo tour
    Demo,
}

const DEMO_SCENE: &str = "demos/campus.yaml";
const DEMO_SCRIPT: &str = "demos/tour.yaml";

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            fmt()?;
            clippy()?;
            cargo("test", &["test", "--workspace"])?;
            doc()?;
        }
        Commands::Fmt => fmt()?,
        Commands::Clippy => clippy()?,
        Commands::Test => cargo("test", &["test", "--workspace"])?,
        Commands::Doc => doc()?,
        Commands::Build => cargo("build", &["build", "--workspace"])?,
        Commands::Demo => demo()?,
    }

    Ok(())
}

/// Run `cargo <args>`, failing with `step` in the message on a non-zero exit.
fn cargo(step: &str, args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {step} failed");
    }
    Ok(())
}

fn fmt() -> Result<()> {
    cargo("fmt", &["fmt", "--all", "--", "--check"])
}

fn clippy() -> Result<()> {
    cargo(
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn doc() -> Result<()> {
    cargo("doc", &["doc", "--workspace", "--no-deps"])
}

fn demo() -> Result<()> {
    let cli = |rest: &[&'static str]| {
        let mut args = vec!["run", "-q", "-p", "campus-cli", "--"];
        args.extend_from_slice(rest);
        args
    };
    cargo("run", &cli(&["validate", "--scene", DEMO_SCENE]))?;
    for command in ["simulate", "replay"] {
        cargo(
            "run",
            &cli(&[command, "--scene", DEMO_SCENE, "--script", DEMO_SCRIPT]),
        )?;
    }
    Ok(())
}
