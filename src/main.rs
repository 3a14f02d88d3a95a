//! Command line front end for walkit.
//!
//! Reads the palette cached by the wallpaper theming tool and prints colors
//! derived from it, or runs the color math on colors given as arguments.
//!
//! # Usage
//!
//! ```text
//! walkit cursor              # most legible cursor color and its contrast
//! walkit scheme [--json]     # every derived color
//! walkit appearance          # "dark", "light" or "unknown"
//! walkit contrast A B        # contrast ratio of two colors
//! walkit luminance C         # relative luminance of a color
//! walkit pick REF C1 C2 ...  # candidate with the best contrast against REF
//! ```
//!
//! Exit codes:
//! - 0: Success
//! - 2: Unable to determine the requested colors
//!
//! # Environment Variables
//!
//! - `WAL_CACHE_DIR`: directory holding `colors.json`, used when `--colors`
//!   is not given (defaults to `~/.cache/wal`).
//! - `DEBUG`: When set, prints intermediate values to stderr.

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};

use walkit::color::{
    Color, DEFAULT_MIN_LUMINANCE, best_contrast_candidate, contrast_ratio, relative_luminance,
};
use walkit::config::colors_path_from_env;
use walkit::logs::debug;
use walkit::{FsStore, Scheme, Thresholds, load_scheme};

#[derive(Parser)]
#[command(name = "walkit", version)]
#[command(about = "Derive legible colors from a wallpaper-generated palette")]
struct Cli {
    /// Palette cache file (default: $WAL_CACHE_DIR/colors.json or ~/.cache/wal/colors.json)
    #[arg(long, global = true)]
    colors: Option<PathBuf>,

    /// Regular slots at or below this luminance never become the cursor
    #[arg(long, global = true)]
    too_dark: Option<f64>,

    /// Lift color0 when its luminance is closer than this to the background
    #[arg(long, global = true)]
    too_similar: Option<f64>,

    /// Backgrounds below this luminance are dark
    #[arg(long, global = true)]
    dark_threshold: Option<f64>,

    /// Adjust accents closer than this in luminance to the background
    #[arg(long, global = true)]
    accent_similarity: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the most legible cursor color and its contrast ratio
    Cursor,
    /// Print every color derived from the palette
    Scheme {
        /// Print JSON instead of `key: value` lines
        #[arg(long)]
        json: bool,
    },
    /// Print whether the palette is dark or light
    Appearance,
    /// Print the contrast ratio between two hex colors
    Contrast {
        /// First color (e.g. "#1d2021")
        a: Color,
        /// Second color
        b: Color,
    },
    /// Print the relative luminance of a hex color
    Luminance {
        /// Color (e.g. "#ebdbb2")
        color: Color,
    },
    /// Print the candidate with the highest contrast against a reference
    Pick {
        /// Reference color, usually the background
        reference: Color,
        /// Candidates in priority order; ties keep the earlier one
        #[arg(required = true)]
        candidates: Vec<Color>,
        /// Skip candidates at or below this luminance
        #[arg(long, default_value_t = DEFAULT_MIN_LUMINANCE)]
        min_luminance: f64,
    },
}

impl Cli {
    fn thresholds(&self) -> Thresholds {
        let defaults = Thresholds::default();
        Thresholds {
            too_dark: self.too_dark.unwrap_or(defaults.too_dark),
            too_similar: self.too_similar.unwrap_or(defaults.too_similar),
            dark_threshold: self.dark_threshold.unwrap_or(defaults.dark_threshold),
            accent_similarity: self.accent_similarity.unwrap_or(defaults.accent_similarity),
            ..defaults
        }
    }

    fn scheme(&self) -> Result<Scheme> {
        let path = colors_path_from_env(self.colors.as_deref())?;
        load_scheme(&FsStore::new(path), &self.thresholds())
    }
}

fn run(cli: &Cli) -> Result<String> {
    match &cli.command {
        Commands::Cursor => {
            let cursor = cli.scheme()?.cursor;
            Ok(format!("{} {:.2}", cursor.color, cursor.contrast))
        }
        Commands::Scheme { json } => {
            let scheme = cli.scheme()?;
            if *json {
                Ok(serde_json::to_string_pretty(&scheme)?)
            } else {
                Ok(scheme.to_string())
            }
        }
        Commands::Appearance => Ok(cli.scheme()?.appearance.to_string()),
        Commands::Contrast { a, b } => Ok(format!("{:.2}", contrast_ratio(*a, *b))),
        Commands::Luminance { color } => Ok(format!("{:.4}", relative_luminance(*color))),
        Commands::Pick {
            reference,
            candidates,
            min_luminance,
        } => {
            let best = best_contrast_candidate(candidates, *reference, *min_luminance);
            if best == *reference {
                debug("no candidate passed the luminance filter");
            }
            Ok(format!("{best} {:.2}", contrast_ratio(best, *reference)))
        }
    }
}

/// Main entry point for walkit.
///
/// Prints the result on stdout and exits 0, or reports the error on stderr
/// and exits 2. `appearance` prints `unknown` when it cannot decide.
fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            process::exit(0);
        }
        Err(err) => {
            debug(&format!("error={err:?}"));
            if matches!(cli.command, Commands::Appearance) {
                println!("unknown");
            }
            eprintln!("walkit: {err:#}");
            process::exit(2);
        }
    }
}
