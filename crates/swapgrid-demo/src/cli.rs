#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args by hand to keep the binary lean. Environment variables with the
//! `SWAPGRID_DEMO_*` prefix provide defaults that explicit flags override.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use swapgrid_runtime::ThemeMode;
use swapgrid_widgets::{ConfigError, ReorderConfig, ReorderStrategy};

use crate::i18n::Lang;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
SwapGrid Demo: drag company tiles by their :: grip to reorder them

USAGE:
    swapgrid-demo [OPTIONS]

OPTIONS:
    --preset=NAME        Tunables preset: company-options (default), dashboard, grid
    --columns=N          Grid columns, 0 fits the terminal width (default: 0)
    --hitbox=F           Inner hit region scale, strictly between 0 and 1
    --cooldown-ms=N      Minimum time between two reorders
    --follow=F           Ghost follow factor in (0, 1], 1 snaps to the pointer
    --strategy=NAME      Reorder strategy: swap (default) or shift
    --theme=MODE         Start in 'dark' or 'light' (overrides the saved theme)
    --lang=CODE          Interface language, 'en' or 'tl' (overrides the saved one)
    --state-file=PATH    Where preferences are saved
    --no-persist         Keep preferences in memory only
    --log-file=PATH      Write tracing output to PATH (filter with RUST_LOG)
    --exit-after-ms=N    Quit automatically after N milliseconds
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    drag ::         Reorder tiles
    t               Toggle dark/light theme
    l               Switch language (en/tl)
    r               Restore the default order
    Esc             Cancel the current drag
    q / Ctrl+C      Quit

ENVIRONMENT VARIABLES:
    SWAPGRID_DEMO_PRESET         Override --preset
    SWAPGRID_DEMO_COLUMNS        Override --columns
    SWAPGRID_DEMO_STRATEGY       Override --strategy
    SWAPGRID_DEMO_THEME          Override --theme
    SWAPGRID_DEMO_LANG           Override --lang
    SWAPGRID_DEMO_STATE_FILE     Override --state-file
    SWAPGRID_DEMO_NO_PERSIST     Set to 1 for --no-persist
    SWAPGRID_DEMO_LOG            Override --log-file
    SWAPGRID_DEMO_EXIT_AFTER_MS  Auto-quit after N milliseconds (for testing)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    /// Tunables preset name.
    pub preset: String,
    /// Grid columns; 0 fits the terminal.
    pub columns: usize,
    pub hit_shrink: Option<f32>,
    pub cooldown_ms: Option<u64>,
    pub follow: Option<f32>,
    pub strategy: Option<ReorderStrategy>,
    /// Forced theme; `None` keeps the saved one.
    pub theme: Option<ThemeMode>,
    /// Forced language; `None` keeps the saved one.
    pub lang: Option<Lang>,
    pub state_file: Option<PathBuf>,
    /// Whether preferences are written to disk.
    pub persist: bool,
    pub log_file: Option<PathBuf>,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            preset: "company-options".into(),
            columns: 0,
            hit_shrink: None,
            cooldown_ms: None,
            follow: None,
            strategy: None,
            theme: None,
            lang: None,
            state_file: None,
            persist: true,
            log_file: None,
            exit_after_ms: 0,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

/// Command-line errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CliError {
    UnknownArgument(String),
    InvalidValue { flag: &'static str, value: String },
    UnknownPreset(String),
    InvalidConfig(ConfigError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownArgument(arg) => write!(f, "unknown argument: {arg}"),
            Self::InvalidValue { flag, value } => write!(f, "invalid {flag} value: {value}"),
            Self::UnknownPreset(name) => write!(f, "unknown preset: {name}"),
            Self::InvalidConfig(e) => write!(f, "invalid tunables: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidConfig(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::InvalidConfig(e)
    }
}

fn parse_value<T: std::str::FromStr>(flag: &'static str, value: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::InvalidValue {
        flag,
        value: value.to_string(),
    })
}

fn parse_strategy(value: &str) -> Result<ReorderStrategy, CliError> {
    ReorderStrategy::parse(value).ok_or_else(|| CliError::InvalidValue {
        flag: "--strategy",
        value: value.to_string(),
    })
}

fn parse_theme(value: &str) -> Result<ThemeMode, CliError> {
    // ThemeMode::parse is lenient; the flag is not.
    match value.to_ascii_lowercase().as_str() {
        "dark" => Ok(ThemeMode::Dark),
        "light" => Ok(ThemeMode::Light),
        _ => Err(CliError::InvalidValue {
            flag: "--theme",
            value: value.to_string(),
        }),
    }
}

fn parse_lang(value: &str) -> Result<Lang, CliError> {
    match value.to_ascii_lowercase().as_str() {
        "en" => Ok(Lang::En),
        "tl" => Ok(Lang::Tl),
        _ => Err(CliError::InvalidValue {
            flag: "--lang",
            value: value.to_string(),
        }),
    }
}

impl Opts {
    /// Parse the process arguments and environment, exiting on `--help`,
    /// `--version`, or an invalid argument.
    pub fn parse() -> Self {
        match Self::from_sources(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("swapgrid-demo {VERSION}");
                process::exit(0);
            }
            Err(e) => {
                eprintln!("{e}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse `args` over defaults taken from `env`.
    ///
    /// Unparseable environment values are ignored; unparseable flags are errors.
    pub fn from_sources<I, F>(args: I, env: F) -> Result<Command, CliError>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Some(val) = env("SWAPGRID_DEMO_PRESET") {
            opts.preset = val;
        }
        if let Some(val) = env("SWAPGRID_DEMO_COLUMNS")
            && let Ok(n) = val.parse()
        {
            opts.columns = n;
        }
        if let Some(val) = env("SWAPGRID_DEMO_STRATEGY")
            && let Ok(strategy) = parse_strategy(&val)
        {
            opts.strategy = Some(strategy);
        }
        if let Some(val) = env("SWAPGRID_DEMO_THEME")
            && let Ok(mode) = parse_theme(&val)
        {
            opts.theme = Some(mode);
        }
        if let Some(val) = env("SWAPGRID_DEMO_LANG")
            && let Ok(lang) = parse_lang(&val)
        {
            opts.lang = Some(lang);
        }
        if let Some(val) = env("SWAPGRID_DEMO_STATE_FILE") {
            opts.state_file = Some(PathBuf::from(val));
        }
        if env("SWAPGRID_DEMO_NO_PERSIST").is_some_and(|v| v == "1" || v == "true") {
            opts.persist = false;
        }
        if let Some(val) = env("SWAPGRID_DEMO_LOG") {
            opts.log_file = Some(PathBuf::from(val));
        }
        if let Some(val) = env("SWAPGRID_DEMO_EXIT_AFTER_MS")
            && let Ok(n) = val.parse()
        {
            opts.exit_after_ms = n;
        }

        // Parse command-line args (override env vars)
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--no-persist" => opts.persist = false,
                other => {
                    if let Some(val) = other.strip_prefix("--preset=") {
                        opts.preset = val.to_string();
                    } else if let Some(val) = other.strip_prefix("--columns=") {
                        opts.columns = parse_value("--columns", val)?;
                    } else if let Some(val) = other.strip_prefix("--hitbox=") {
                        opts.hit_shrink = Some(parse_value("--hitbox", val)?);
                    } else if let Some(val) = other.strip_prefix("--cooldown-ms=") {
                        opts.cooldown_ms = Some(parse_value("--cooldown-ms", val)?);
                    } else if let Some(val) = other.strip_prefix("--follow=") {
                        opts.follow = Some(parse_value("--follow", val)?);
                    } else if let Some(val) = other.strip_prefix("--strategy=") {
                        opts.strategy = Some(parse_strategy(val)?);
                    } else if let Some(val) = other.strip_prefix("--theme=") {
                        opts.theme = Some(parse_theme(val)?);
                    } else if let Some(val) = other.strip_prefix("--lang=") {
                        opts.lang = Some(parse_lang(val)?);
                    } else if let Some(val) = other.strip_prefix("--state-file=") {
                        opts.state_file = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--log-file=") {
                        opts.log_file = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        opts.exit_after_ms = parse_value("--exit-after-ms", val)?;
                    } else {
                        return Err(CliError::UnknownArgument(other.to_string()));
                    }
                }
            }
        }

        // Surface bad tunables before the terminal is taken over.
        opts.reorder_config()?;
        Ok(Command::Run(opts))
    }

    /// The preset with individual overrides applied, validated.
    pub fn reorder_config(&self) -> Result<ReorderConfig, CliError> {
        let mut config = ReorderConfig::preset(&self.preset)
            .ok_or_else(|| CliError::UnknownPreset(self.preset.clone()))?;
        if let Some(hit_shrink) = self.hit_shrink {
            config = config.with_hit_shrink(hit_shrink);
        }
        if let Some(ms) = self.cooldown_ms {
            config = config.with_cooldown(Duration::from_millis(ms));
        }
        if let Some(follow) = self.follow {
            config = config.with_follow_factor(follow);
        }
        if let Some(strategy) = self.strategy {
            config = config.with_strategy(strategy);
        }
        config.validate()?;
        Ok(config)
    }
}
