use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod error;

use commands::layout::ReportFormat;
use commands::render::{RenderFormat, RenderToggles};
use commands::VisibilityArg;
use config::Config;
use error::{print_error_and_exit, CliError};

#[derive(Parser)]
#[command(name = "rmsk")]
#[command(about = "RmskView - joined RepeatMasker track layout and rendering")]
#[command(version)]
#[command(long_about = "
RmskView lays out joined RepeatMasker annotations into rows and draws them
as detailed glyphs (aligned blocks, unaligned arms, labels) or as coarse
class-colored boxes, depending on the window size and display mode.

Examples:
  rmsk layout --input hg38.rmsk.txt --window chr1:10000-20000
  rmsk layout --input hg38.rmsk.txt --window chr1:10000-20000 --format json
  rmsk render --input hg38.rmsk.txt --window chr1:10000-20000 --out track.svg
  rmsk render --input hg38.rmsk.txt --window chr1:0-2000000 --visibility pack --out track.png
  rmsk config --example > rmsk.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the row assigned to every record in a window
    Layout {
        /// bigRmsk text file (bigBedToBed output)
        #[arg(short, long, required = true)]
        input: PathBuf,

        /// Window to lay out (e.g. 'chr1:10000-20000')
        #[arg(short, long, required = true)]
        window: String,

        /// Display mode
        #[arg(long)]
        visibility: Option<VisibilityArg>,

        /// Keep only records whose name matches this wildcard
        #[arg(long)]
        filter: Option<String>,

        /// Interpret --filter as a regular expression
        #[arg(long)]
        regex: bool,

        /// Width of the data area in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Pixels per base, overriding the width-derived scale
        #[arg(long)]
        pixels_per_base: Option<f64>,

        /// Report format
        #[arg(long, default_value = "tsv")]
        format: ReportFormat,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Export a track to SVG/PNG
    Render {
        /// bigRmsk text file (bigBedToBed output)
        #[arg(short, long, required = true)]
        input: PathBuf,

        /// Window to draw (e.g. 'chr1:10000-20000')
        #[arg(short, long, required = true)]
        window: String,

        /// Output file (SVG/PNG)
        #[arg(short, long, required = true)]
        out: PathBuf,

        /// Output format (auto-detected from extension)
        #[arg(long)]
        format: Option<RenderFormat>,

        /// Display mode
        #[arg(long)]
        visibility: Option<VisibilityArg>,

        /// Keep only records whose name matches this wildcard
        #[arg(long)]
        filter: Option<String>,

        /// Interpret --filter as a regular expression
        #[arg(long)]
        regex: bool,

        /// Width of the data area in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Title drawn above the track
        #[arg(long)]
        title: Option<String>,

        /// Hide record labels
        #[arg(long)]
        no_labels: bool,

        /// Hide unaligned arms
        #[arg(long)]
        no_arms: bool,

        /// Omit the class legend
        #[arg(long)]
        no_legend: bool,

        /// Omit the footer line
        #[arg(long)]
        no_footer: bool,
    },

    /// Print or write the default configuration
    Config {
        /// Print a full example rmsk.toml
        #[arg(long)]
        example: bool,

        /// Write the default configuration to this path
        #[arg(long)]
        init: Option<PathBuf>,
    },
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Layout {
            input,
            window,
            visibility,
            filter,
            regex,
            width,
            pixels_per_base,
            format,
            out,
        } => {
            commands::layout::execute(
                &config,
                input,
                window,
                visibility,
                filter,
                regex,
                width,
                pixels_per_base,
                format,
                out,
            )?;
        }

        Commands::Render {
            input,
            window,
            out,
            format,
            visibility,
            filter,
            regex,
            width,
            title,
            no_labels,
            no_arms,
            no_legend,
            no_footer,
        } => {
            let toggles = RenderToggles {
                no_labels,
                no_arms,
                no_legend,
                no_footer,
            };
            commands::render::execute(
                &config, input, window, out, format, visibility, filter, regex, width, title, toggles,
            )?;
        }

        Commands::Config { example, init } => {
            if let Some(path) = &init {
                if path.exists() {
                    return Err(CliError::config(format!("{} already exists", path.display())).into());
                }
                Config::default().save_to_file(path)?;
                log::info!("Wrote default configuration to {}", path.display());
            }
            if example || init.is_none() {
                print!("{}", Config::example_toml()?);
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            log::debug!("{:#}", err);
            print_error_and_exit(cli_err);
        }
        return Err(err);
    }

    Ok(())
}
