//! CLI binary for pdf2pptx.
//!
//! With an input path it converts once and exits. Without one (or with
//! `--interactive`) it runs a small prompt-driven shell on top of
//! [`pdf2pptx::ShellState`].

use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use pdf2pptx::{
    convert, default_output_root, ConversionConfig, ConversionRequest, LogSink, ProgressSink,
    ShellState,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

/// Progress values are mapped onto this many bar ticks.
const BAR_TICKS: u64 = 1000;

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(BAR_TICKS);
    let style = ProgressStyle::with_template(
        "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {percent:>3}%  ⏱ {elapsed_precise}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▉▊▋▌▍▎▏  ")
    .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
    bar.set_style(style);
    bar.set_prefix("Converting");
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

fn bar_position(value: f64) -> u64 {
    (value.clamp(0.0, 1.0) * BAR_TICKS as f64).round() as u64
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert into ~/Downloads/report/report.pptx
  pdf2pptx report.pdf

  # Custom output folder, higher resolution, don't open the folder afterwards
  pdf2pptx report.pdf -o ./decks --dpi 300 --no-open

  # Machine-readable result
  pdf2pptx --json --no-open report.pdf > result.json

  # Prompt-driven mode (also the default when no INPUT is given)
  pdf2pptx -i

OUTPUT LAYOUT:
  <OUTPUT_DIR>/<name>/pages/page_001.jpg ... page_NNN.jpg
  <OUTPUT_DIR>/<name>/<name>.pptx

  Slides are sized from the first page (pixels / dpi inches); every page is
  scaled to cover the slide and centred.

ENVIRONMENT VARIABLES:
  PDF2PPTX_OUTPUT_DIR  Default output folder (otherwise your Downloads folder)
  PDF2PPTX_DPI         Default rasterisation resolution
  PDF2PPTX_QUALITY     Default JPEG quality
  PDFIUM_LIB_PATH      Path to libpdfium (otherwise next to the binary, the
                       working directory, then the system library path)
  RUST_LOG             Override log filtering (e.g. RUST_LOG=pdf2pptx=debug)
"#;

/// Convert PDF documents into full-bleed picture slide decks.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2pptx",
    version,
    about = "Convert a PDF into a PPTX deck with one full-bleed slide per page",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF to convert. Omit to start the interactive shell.
    input: Option<PathBuf>,

    /// Folder under which `<name>/` is created.
    #[arg(short, long = "output-dir", env = "PDF2PPTX_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Rasterisation resolution (72–400). Also sets the slide size.
    #[arg(long, env = "PDF2PPTX_DPI", default_value_t = pdf2pptx::config::DEFAULT_DPI,
          value_parser = clap::value_parser!(u32).range(72..=400))]
    dpi: u32,

    /// JPEG quality for page images (1–100).
    #[arg(long, env = "PDF2PPTX_QUALITY", default_value_t = pdf2pptx::config::DEFAULT_JPEG_QUALITY,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Keep page images left over from an earlier run.
    #[arg(long)]
    keep_stale_pages: bool,

    /// Do not open the output folder when done.
    #[arg(long, env = "PDF2PPTX_NO_OPEN")]
    no_open: bool,

    /// Print the ConversionResult as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2PPTX_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,

    /// Run the interactive shell even when INPUT is given.
    #[arg(short, long)]
    interactive: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = cli.interactive || cli.input.is_none();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar and log lines carry everything a user needs, so
    // library INFO logs are only shown when the bar is off.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress || interactive {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;

    if interactive {
        return run_interactive(cli.input.clone(), config).await;
    }

    let Some(input) = cli.input.clone() else {
        anyhow::bail!("no input PDF given");
    };
    run_once(&cli, input, config).await
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let output_root = cli.output_dir.clone().unwrap_or_else(default_output_root);
    ConversionConfig::builder()
        .dpi(cli.dpi)
        .jpeg_quality(cli.quality)
        .output_root(output_root)
        .open_output_folder(!cli.no_open)
        .clear_stale_pages(!cli.keep_stale_pages)
        .build()
        .context("Invalid configuration")
}

// ── One-shot mode ────────────────────────────────────────────────────────────

async fn run_once(cli: &Cli, input: PathBuf, config: ConversionConfig) -> Result<()> {
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let bar = show_progress.then(progress_bar);

    let log: Arc<dyn LogSink> = match (&bar, cli.quiet || cli.json) {
        (Some(bar), _) => {
            let bar = bar.clone();
            Arc::new(move |line: &str| bar.println(format!("  {} {}", dim("·"), line)))
        }
        (None, false) => Arc::new(|line: &str| eprintln!("{line}")),
        (None, true) => pdf2pptx::progress::noop_log(),
    };
    let progress: Arc<dyn ProgressSink> = match &bar {
        Some(bar) => {
            let bar = bar.clone();
            Arc::new(move |value: f64| bar.set_position(bar_position(value)))
        }
        None => pdf2pptx::progress::noop_progress(),
    };

    let request = ConversionRequest::new(&input, config)
        .with_log(log)
        .with_progress(progress);

    let outcome = convert(request).await;
    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }
    let result = outcome.with_context(|| format!("Conversion of {} failed", input.display()))?;

    if cli.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialise result")?;
        println!("{json}");
    } else if !cli.quiet {
        eprintln!(
            "{}  {} slides  {:.2} x {:.2} in  {}ms  →  {}",
            green("✔"),
            result.slide_count,
            result.canvas.width_inches(),
            result.canvas.height_inches(),
            result.elapsed_ms,
            bold(&result.output.display().to_string()),
        );
    }
    Ok(())
}

// ── Interactive shell ────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Action {
    SelectPdf,
    ChangeFolder,
    Convert,
    Clear,
    Quit,
}

async fn run_interactive(initial: Option<PathBuf>, config: ConversionConfig) -> Result<()> {
    eprintln!("{}", bold("PDF → PPTX"));
    let mut state = ShellState::new(config.output_root.clone());
    if initial.is_some() {
        state.select_input(initial);
    }
    let mut printed = 0;

    loop {
        printed = print_new_lines(&state, printed, None);
        eprintln!(
            "{} {}   {} {}",
            dim("PDF:"),
            state
                .input()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "none selected".to_string()),
            dim("Output:"),
            state.output_dir().display()
        );

        let mut actions = vec![(Action::SelectPdf, "Select PDF"), (Action::ChangeFolder, "Change output folder")];
        if state.can_start() {
            actions.push((Action::Convert, "Convert"));
        }
        if state.can_clear() {
            actions.push((Action::Clear, "Clear"));
        }
        actions.push((Action::Quit, "Quit"));

        let labels: Vec<&str> = actions.iter().map(|(_, label)| *label).collect();
        let choice = Select::new()
            .with_prompt("What next?")
            .items(&labels)
            .default(0)
            .interact_opt()
            .context("Prompt failed")?;

        let Some(choice) = choice else { break };
        match actions[choice].0 {
            Action::SelectPdf => state.select_input(prompt_path("PDF file", true)?),
            Action::ChangeFolder => state.select_output_dir(prompt_path("Output folder", false)?),
            Action::Clear => {
                state.clear();
                printed = 0;
            }
            Action::Convert => {
                let worker = state.start(config.clone())?;
                let bar = progress_bar();
                let mut shown = printed;
                state
                    .follow(worker, |s| {
                        shown = print_new_lines(s, shown, Some(&bar));
                        bar.set_position(bar_position(s.progress()));
                    })
                    .await;
                bar.finish_and_clear();
                printed = shown;
            }
            Action::Quit => break,
        }
    }
    Ok(())
}

/// Print the log lines added since `from`; returns the new count.
fn print_new_lines(state: &ShellState, from: usize, bar: Option<&ProgressBar>) -> usize {
    let lines = state.log_lines();
    for line in lines.iter().skip(from) {
        let styled = if line.starts_with("ERROR:") {
            red(line)
        } else if line.starts_with("Finished") || line == "Conversion finished." {
            green(line)
        } else {
            format!("{} {}", cyan("›"), line)
        };
        match bar {
            Some(bar) => bar.println(styled),
            None => eprintln!("{styled}"),
        }
    }
    lines.len()
}

/// Ask for a path; an empty answer means "cancel".
fn prompt_path(prompt: &str, must_be_file: bool) -> Result<Option<PathBuf>> {
    let answer: String = Input::new()
        .with_prompt(format!("{prompt} (empty to cancel)"))
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), String> {
            let path = Path::new(input.trim());
            if input.trim().is_empty() {
                Ok(())
            } else if must_be_file && !path.is_file() {
                Err(format!("'{}' is not a file", input.trim()))
            } else if !must_be_file && path.exists() && !path.is_dir() {
                Err(format!("'{}' is not a folder", input.trim()))
            } else {
                Ok(())
            }
        })
        .interact_text()
        .context("Prompt failed")?;

    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(None);
    }
    let path = PathBuf::from(answer);
    Ok(Some(std::fs::canonicalize(&path).unwrap_or(path)))
}
