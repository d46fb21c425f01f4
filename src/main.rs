use clap::{Parser, Subcommand};
use rasterkit::audit::{self, AuditSink, FileAuditLog};
use rasterkit::config::{self, AppConfig};
use rasterkit::editor::{self, Editor};
use rasterkit::imaging::{OperationSpec, Quality, RowBandScheduler, RustCodec};
use rasterkit::output;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "rasterkit")]
#[command(about = "Apply pixel transforms to images")]
#[command(long_about = "\
Apply pixel transforms to images

Operations run in the order given, each on the result of the previous one:

  negative         invert colors (alpha kept)
  threshold[=N]    black/white split at brightness N (0-255, default 128)
  edges            edge magnitude as grayscale (image must be at least 2x2)
  resize=WxH       nearest-neighbor resize (1-3000 per side by default)
  rotate-left      rotate -90°
  rotate-right     rotate +90°

Example:

  rasterkit apply beach.jpg --op rotate-right --op threshold=100 --save-as beach-bw

Every load, operation, save and failure is appended to the audit log
(app.txt by default); --verbose also echoes those entries to stderr.
Run 'rasterkit gen-config' for a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Worker threads per operation (overrides processing.workers)
    #[arg(long, global = true)]
    workers: Option<usize>,

    /// Echo audit entries to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load an image, apply operations, and optionally save the result
    Apply {
        /// Input image
        input: PathBuf,
        /// Operation to apply; repeat for several
        #[arg(long = "op", value_name = "OP")]
        ops: Vec<OperationSpec>,
        /// Save the result under this name (extension is added)
        #[arg(long)]
        save_as: Option<String>,
        /// Save into this directory instead of save.directory
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Show the dimensions of an image and how it would be banded
    Info {
        /// Input image
        input: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_lines(&output::format_error(&*e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.verbose {
        audit::init_stderr_logger(log::LevelFilter::Info)
            .map_err(|e| e.to_string())?;
    }

    match cli.command {
        Command::Apply {
            input,
            ops,
            save_as,
            out_dir,
        } => {
            let config = load_config(cli.config.as_deref(), cli.workers)?;
            let mut editor = build_editor(config)?;
            if let Some(dir) = out_dir {
                editor = editor.with_save_dir(dir);
            }

            let opened = editor.open(&input)?;
            output::print_lines(&output::format_opened(&opened));

            for op in &ops {
                editor.apply(op)?;
                let dims = editor.session().current()?.dimensions();
                output::print_lines(&output::format_applied(op, dims));
            }

            if let Some(name) = save_as {
                let outcome = editor.save(&name)?;
                output::print_lines(&output::format_saved(&outcome));
            }
        }
        Command::Info { input } => {
            let config = load_config(cli.config.as_deref(), cli.workers)?;
            let codec = RustCodec::new(Quality::new(config.save.quality));
            let opened = editor::inspect(&codec, &config.input, &input)?;
            let scheduler = RowBandScheduler::new(config.processing.workers)?;
            let bands = scheduler.bands(opened.height);
            output::print_lines(&output::format_info(&opened, &bands));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config file, then apply the `--workers` override and re-validate.
fn load_config(
    path: Option<&Path>,
    workers: Option<usize>,
) -> Result<AppConfig, config::ConfigError> {
    let mut config = match path {
        Some(p) => config::load_config_file(p)?,
        None => config::load_config(Path::new("."))?,
    };
    if let Some(n) = workers {
        config.processing.workers = n;
        config.validate()?;
    }
    Ok(config)
}

fn build_editor(config: AppConfig) -> Result<Editor<RustCodec>, Box<dyn std::error::Error>> {
    let audit: Arc<dyn AuditSink> = Arc::new(FileAuditLog::open(&config.log.path)?);
    let codec = RustCodec::new(Quality::new(config.save.quality));
    Ok(Editor::new(config, codec, audit)?)
}
