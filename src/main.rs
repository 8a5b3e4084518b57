use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use pwsynth::{Category, ConfigError, GenerationError, PasswordRequest, Requirement};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "pwsynth", version, about = "Generate passwords with per-category minimums")]
struct Cli {
    /// Total password length.
    #[arg(short = 'L', long, allow_negative_numbers = true)]
    length: Option<i64>,
    /// Minimum lowercase letters (true, false or a count).
    #[arg(long, value_name = "REQ")]
    lowercase: Option<Requirement>,
    /// Minimum uppercase letters (true, false or a count).
    #[arg(long, value_name = "REQ")]
    uppercase: Option<Requirement>,
    /// Minimum digits (true, false or a count).
    #[arg(long, value_name = "REQ")]
    digit: Option<Requirement>,
    /// Minimum symbols (true, false or a count).
    #[arg(long, value_name = "REQ")]
    symbol: Option<Requirement>,
    /// Do not require lowercase letters.
    #[arg(short = 'l', long, conflicts_with = "lowercase")]
    no_lowercase: bool,
    /// Do not require uppercase letters.
    #[arg(short = 'u', long, conflicts_with = "uppercase")]
    no_uppercase: bool,
    /// Do not require digits.
    #[arg(short = 'n', long, conflicts_with = "digit")]
    no_digit: bool,
    /// Do not require symbols.
    #[arg(short = 's', long, conflicts_with = "symbol")]
    no_symbol: bool,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of passwords to generate.
    #[arg(short = 'c', long, default_value_t = 1)]
    count: usize,
    /// Print JSON with per-category counts.
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Defaults file (JSON). Falls back to the user config dir.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn apply(&self, request: &mut PasswordRequest) {
        if let Some(length) = self.length {
            request.length = length;
        }

        let overrides = [
            (Category::Lowercase, self.lowercase, self.no_lowercase),
            (Category::Uppercase, self.uppercase, self.no_uppercase),
            (Category::Digit, self.digit, self.no_digit),
            (Category::Symbol, self.symbol, self.no_symbol),
        ];

        for (category, requirement, disabled) in overrides {
            if disabled {
                request.set_requirement(category, Requirement::Include(false));
            } else if let Some(requirement) = requirement {
                request.set_requirement(category, requirement);
            }
        }
    }
}

#[derive(Serialize)]
struct GeneratedPassword {
    password: String,
    counts: BTreeMap<Category, usize>,
}

impl GeneratedPassword {
    fn new(password: String) -> Self {
        let mut counts = BTreeMap::new();
        for category in password.chars().filter_map(Category::of) {
            *counts.entry(category).or_insert(0) += 1;
        }
        Self { password, counts }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("pwsynth: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut request = pwsynth::config::load(cli.config.as_deref())?;
    cli.apply(&mut request);

    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
    tracing::debug!(seed, count = cli.count, "generating");

    let mut source = pwsynth::seeded(seed);
    let passwords = pwsynth::generate_batch(&request, cli.count, &mut source)?;

    if cli.json {
        let output: Vec<GeneratedPassword> =
            passwords.into_iter().map(GeneratedPassword::new).collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for password in passwords {
            println!("{password}");
        }
    }

    Ok(())
}
