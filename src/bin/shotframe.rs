use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use shotframe::{BatchObserver, BatchOpts, BatchReport, FrameConfig, FrameError, FrameRenderer};

#[derive(Parser, Debug)]
#[command(name = "shotframe", version, about = "Frame App Store screenshots per locale")]
struct Cli {
    /// Screenshots directory containing one subdirectory per locale.
    #[arg(default_value = "screenshots")]
    dir: PathBuf,

    /// JSON config overriding colors, padding, fonts and titles.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only process this locale directory (repeatable).
    #[arg(long = "locale")]
    locales: Vec<String>,

    /// Print diagnostics about title font resolution (origin, family, SHA-256 of font bytes).
    #[arg(long)]
    dump_fonts: bool,

    /// Increase log verbosity on stderr (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => FrameConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => FrameConfig::default(),
    };

    if !cli.dir.is_dir() {
        println!("Error: Screenshots directory not found: {}", cli.dir.display());
        return Ok(());
    }

    let mut renderer = FrameRenderer::new(config);
    let opts = BatchOpts {
        locales: cli.locales.iter().cloned().collect(),
    };

    if cli.dump_fonts {
        dump_font_diagnostics(&cli.dir, &opts.locales, &mut renderer);
    }

    shotframe::process_screenshots(&cli.dir, &opts, &mut renderer, &mut StdoutProgress)
        .with_context(|| format!("process screenshots in '{}'", cli.dir.display()))?;
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Prints per-file progress and the final tally to stdout.
struct StdoutProgress;

impl BatchObserver for StdoutProgress {
    fn locale_started(&mut self, locale: &str) {
        println!("\nProcessing {locale}...");
    }

    fn file_framed(&mut self, input: &Path, _output: &Path) {
        println!("  ✓ {}", display_name(input));
    }

    fn file_skipped(&mut self, input: &Path, error: &FrameError) {
        println!("  ✗ {}: {error}", display_name(input));
    }

    fn finished(&mut self, report: &BatchReport) {
        println!(
            "\nDone! Processed: {}, Skipped: {}",
            report.processed,
            report.skipped_count()
        );
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn dump_font_diagnostics(dir: &Path, filter: &BTreeSet<String>, renderer: &mut FrameRenderer) {
    let mut locales: BTreeSet<String> = filter.clone();
    if locales.is_empty() {
        locales = std::fs::read_dir(dir)
            .into_iter()
            .flatten()
            .flatten()
            .filter(|e| e.path().is_dir())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
    }
    if locales.is_empty() {
        locales = renderer.catalog().locales().map(str::to_owned).collect();
    }

    eprintln!("title font diagnostics:");
    for locale in &locales {
        eprintln!("  {locale}:");
        match renderer.resolve_font(locale) {
            Ok(font) => {
                eprintln!("    origin:  {}", font.origin);
                eprintln!("    family:  {}", font.family);
                eprintln!("    index:   {}", font.index);
                eprintln!("    sha256:  {}", font.sha256_hex());
            }
            Err(e) => eprintln!("    error:   {e}"),
        }
    }
}
