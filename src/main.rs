// ABOUTME: Main entry point for the matisse program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an impress.js presentation from an extended markdown source
    Build(BuildArgs),

    /// Build, then rebuild whenever the source changes
    Watch(WatchArgs),

    /// Write a sample source and build it
    Sample(SampleArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// Path to the markdown source
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory (defaults to a directory named after the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// CSS files to include (local paths or URLs)
    #[arg(long, value_delimiter = ',')]
    css: Option<Vec<String>>,

    /// JavaScript files to include (local paths or URLs)
    #[arg(long, value_delimiter = ',')]
    js: Option<Vec<String>>,

    /// Mode for CSS/JS: 'embed' to embed content or 'link' to reference
    #[arg(long)]
    mode: Option<String>,

    /// Insert a TOC slide of this depth at the beginning of each chapter
    #[arg(long)]
    toc_at_chap_beginning: Option<usize>,

    /// Insert a TOC slide of this depth at the beginning of each section
    #[arg(long)]
    toc_at_sec_beginning: Option<usize>,

    /// Insert a TOC slide of this depth at the beginning of each subsection
    #[arg(long)]
    toc_at_subsec_beginning: Option<usize>,

    /// highlight.js style for code blocks (default github); 'disable' turns it off
    #[arg(long)]
    highlight_style: Option<String>,

    /// Leave LaTeX math as plain text instead of loading MathJax
    #[arg(long)]
    no_mathjax: bool,
}

#[derive(Args)]
struct WatchArgs {
    #[command(flatten)]
    build: BuildArgs,

    /// Debounce time in milliseconds
    #[arg(long, default_value_t = 500)]
    debounce_ms: u64,
}

#[derive(Args)]
struct SampleArgs {
    /// Where to write the sample markdown source
    #[arg(short, long, default_value = "sample.md")]
    output: PathBuf,
}

fn build_config(
    config: &matisse::Config,
    args: &BuildArgs,
) -> matisse::Result<matisse::BuildConfig> {
    config
        .with_renderers(args.highlight_style.as_deref(), args.no_mathjax)
        .get_build_config(
            &args.input,
            args.output.clone(),
            args.css.clone(),
            args.js.clone(),
            args.mode.as_deref(),
            args.toc_at_chap_beginning,
            args.toc_at_sec_beginning,
            args.toc_at_subsec_beginning,
        )
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = matisse::Config::from_env();

    let result: anyhow::Result<()> = match &cli.command {
        Some(Commands::Build(args)) => {
            println!("Executing build command...");
            build_config(&config, args)
                .and_then(|build| matisse::build_presentation(&build))
                .map(|output| println!("Presentation generated successfully: {:?}", output))
                .with_context(|| format!("Failed to build {:?}", args.input))
        }
        Some(Commands::Watch(args)) => {
            println!("Executing watch command...");
            build_config(&config, &args.build)
                .map(|build| config.get_watch_config(build, Some(args.debounce_ms)))
                .and_then(matisse::watch_markdown)
                .with_context(|| format!("Failed to watch {:?}", args.build.input))
        }
        Some(Commands::Sample(args)) => {
            println!("Executing sample command...");
            matisse::write_sample(&args.output)
                .and_then(|_| {
                    config.get_build_config(&args.output, None, None, None, None, None, None, None)
                })
                .and_then(|build| matisse::build_presentation(&build))
                .map(|output| println!("Sample presentation generated: {:?}", output))
                .context("Failed to generate the sample presentation")
        }
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
