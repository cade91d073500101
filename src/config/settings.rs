use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::warn;

use quotabar_core::cache::FileCache;
use quotabar_core::config::{BarStyle, ConfigStore, Direction, DisplayMode, RenderConfig};
use quotabar_core::usage::{default_credentials_path, DEFAULT_ENDPOINT, DEFAULT_FETCH_TIMEOUT};

use crate::output::OutputFormat;

pub const ENV_WIDTH: &str = "QUOTABAR_WIDTH";
pub const ENV_STYLE: &str = "QUOTABAR_STYLE";
pub const ENV_DISPLAY: &str = "QUOTABAR_DISPLAY";
pub const ENV_CACHE_TTL: &str = "QUOTABAR_CACHE_TTL";
pub const ENV_CREDENTIALS: &str = "QUOTABAR_CREDENTIALS";
pub const ENV_CACHE_DIR: &str = "QUOTABAR_CACHE_DIR";
pub const ENV_CONFIG: &str = "QUOTABAR_CONFIG";
pub const ENV_ENDPOINT: &str = "QUOTABAR_ENDPOINT";

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Subscription usage bars for statuslines and status bars")]
pub struct Config {
    /// Enable debug logging (stderr)
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format: plain text for statuslines, JSON for waybar-style bars
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Bar width in cells
    #[arg(short, long)]
    pub width: Option<u16>,

    /// Bar style (ascii, unicode, braille, minimal)
    #[arg(short, long)]
    pub style: Option<String>,

    /// Windows to display (all, five_hour, seven_day, sonnet, minimal)
    #[arg(long)]
    pub display: Option<String>,

    /// Ignore cached data and rendered output
    #[arg(long)]
    pub no_cache: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Cycle a display option, or reset / show the persisted config
    Cycle {
        /// Option to cycle (style, display, width) or reset / status
        #[arg(value_enum)]
        axis: CycleAxis,
        /// Direction (up/next or down/prev), default up
        #[arg(value_enum)]
        direction: Option<CycleDirection>,
    },
    /// Remove cached usage data and rendered output
    ClearCache,
}

/// Argument of `cycle`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleAxis {
    Style,
    Display,
    Width,
    Reset,
    Status,
}

/// Direction argument of `cycle`
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CycleDirection {
    #[default]
    #[value(alias = "next")]
    Up,
    #[value(alias = "prev")]
    Down,
}

impl From<CycleDirection> for Direction {
    fn from(direction: CycleDirection) -> Self {
        match direction {
            CycleDirection::Up => Direction::Next,
            CycleDirection::Down => Direction::Previous,
        }
    }
}

impl Config {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Runtime settings
///
/// Render settings are layered: built-in defaults, then environment,
/// then the persisted config file, then command line flags.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Defaults plus environment, before the config file is applied
    pub env_render: RenderConfig,
    /// Effective render settings
    pub render: RenderConfig,
    /// TTL for both cache tiers in seconds
    pub cache_ttl_secs: u64,
    /// Request timeout for the usage fetch in seconds
    pub fetch_timeout_secs: u64,
    pub endpoint: String,
    pub credentials_path: PathBuf,
    pub config_path: PathBuf,
    pub cache_dir: PathBuf,
}

fn default_cache_ttl() -> u64 {
    60
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            env_render: RenderConfig::default(),
            render: RenderConfig::default(),
            cache_ttl_secs: default_cache_ttl(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT.as_secs(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            credentials_path: default_credentials_path()
                .unwrap_or_else(|| PathBuf::from(".credentials.json")),
            config_path: ConfigStore::default_path()
                .unwrap_or_else(|| PathBuf::from(".quotabar.toml")),
            cache_dir: FileCache::default_dir(),
        }
    }
}

impl Settings {
    /// Resolve settings for this invocation. Never fails; bad values are
    /// logged and replaced with defaults.
    pub fn load(cli: &Config) -> Self {
        let mut settings = Self::from_env();
        if let Some(path) = &cli.config {
            settings.config_path = path.clone();
        }
        settings.render = ConfigStore::new(&settings.config_path).resolve(settings.env_render);
        settings.merge_cli(cli);
        settings.validate();
        settings
    }

    /// Defaults overridden by `QUOTABAR_*` environment variables
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Some(width) = env_var(ENV_WIDTH) {
            match width.parse::<u16>() {
                Ok(w) if w > 0 => settings.env_render.bar_width = w,
                _ => warn!("Ignoring invalid {}={}", ENV_WIDTH, width),
            }
        }
        if let Some(style) = env_var(ENV_STYLE) {
            settings.env_render.style = BarStyle::parse_lenient(&style);
        }
        if let Some(display) = env_var(ENV_DISPLAY) {
            settings.env_render.display = DisplayMode::parse_lenient(&display);
        }
        if let Some(ttl) = env_var(ENV_CACHE_TTL) {
            match ttl.parse::<u64>() {
                Ok(ttl) => settings.cache_ttl_secs = ttl,
                Err(_) => warn!("Ignoring invalid {}={}", ENV_CACHE_TTL, ttl),
            }
        }
        if let Some(path) = env_var(ENV_CREDENTIALS) {
            settings.credentials_path = PathBuf::from(path);
        }
        if let Some(path) = env_var(ENV_CACHE_DIR) {
            settings.cache_dir = PathBuf::from(path);
        }
        if let Some(path) = env_var(ENV_CONFIG) {
            settings.config_path = PathBuf::from(path);
        }
        if let Some(endpoint) = env_var(ENV_ENDPOINT) {
            settings.endpoint = endpoint;
        }

        settings.render = settings.env_render;
        settings
    }

    /// Merge CLI flags into settings (CLI takes precedence)
    pub fn merge_cli(&mut self, cli: &Config) {
        if let Some(width) = cli.width {
            self.render.bar_width = width;
        }
        if let Some(style) = &cli.style {
            self.render.style = BarStyle::parse_lenient(style);
        }
        if let Some(display) = &cli.display {
            self.render.display = DisplayMode::parse_lenient(display);
        }
    }

    /// Validate and normalize settings values
    pub fn validate(&mut self) {
        const MIN_FETCH_TIMEOUT: u64 = 1;

        self.env_render = self.env_render.normalized();
        self.render = self.render.normalized();
        if self.fetch_timeout_secs < MIN_FETCH_TIMEOUT {
            self.fetch_timeout_secs = MIN_FETCH_TIMEOUT;
        }
    }
}

/// Non-empty, trimmed environment variable
fn env_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 8] = [
        ENV_WIDTH,
        ENV_STYLE,
        ENV_DISPLAY,
        ENV_CACHE_TTL,
        ENV_CREDENTIALS,
        ENV_CACHE_DIR,
        ENV_CONFIG,
        ENV_ENDPOINT,
    ];

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("quotabar").chain(args.iter().copied()))
            .expect("Should parse args")
    }

    #[test]
    fn test_default_settings() {
        temp_env::with_vars_unset(ALL_VARS, || {
            let settings = Settings::from_env();
            assert_eq!(settings.render, RenderConfig::default());
            assert_eq!(settings.cache_ttl_secs, 60);
            assert_eq!(settings.fetch_timeout_secs, 10);
            assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
        });
    }

    #[test]
    fn test_env_overrides() {
        temp_env::with_vars(
            [
                (ENV_WIDTH, Some("12")),
                (ENV_STYLE, Some("braille")),
                (ENV_DISPLAY, Some("fiveHour")),
                (ENV_CACHE_TTL, Some("5")),
                (ENV_CREDENTIALS, Some("/tmp/creds.json")),
            ],
            || {
                let settings = Settings::from_env();
                assert_eq!(settings.env_render.bar_width, 12);
                assert_eq!(settings.env_render.style, BarStyle::Braille);
                assert_eq!(settings.env_render.display, DisplayMode::FiveHour);
                assert_eq!(settings.cache_ttl_secs, 5);
                assert_eq!(settings.credentials_path, PathBuf::from("/tmp/creds.json"));
            },
        );
    }

    #[test]
    fn test_invalid_env_values_fall_back() {
        temp_env::with_vars(
            [
                (ENV_WIDTH, Some("0")),
                (ENV_STYLE, Some("neon")),
                (ENV_CACHE_TTL, Some("soon")),
            ],
            || {
                let settings = Settings::from_env();
                assert_eq!(settings.env_render.bar_width, 8);
                assert_eq!(settings.env_render.style, BarStyle::Unicode);
                assert_eq!(settings.cache_ttl_secs, 60);
            },
        );
    }

    #[test]
    fn test_config_file_beats_env_and_cli_beats_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "style = \"ascii\"\nwidth = 16\n").unwrap();
        let config_arg = path.to_str().unwrap();

        temp_env::with_vars(
            [
                (ENV_STYLE, Some("braille")),
                (ENV_DISPLAY, Some("sonnet")),
                (ENV_WIDTH, None),
                (ENV_CONFIG, None),
            ],
            || {
                let settings = Settings::load(&parse(&["-c", config_arg]));
                assert_eq!(settings.env_render.style, BarStyle::Braille);
                assert_eq!(settings.render.style, BarStyle::Ascii);
                assert_eq!(settings.render.display, DisplayMode::Sonnet);
                assert_eq!(settings.render.bar_width, 16);

                let settings =
                    Settings::load(&parse(&["-c", config_arg, "--style", "minimal", "-w", "0"]));
                assert_eq!(settings.render.style, BarStyle::Minimal);
                // zero width is normalized back to the default
                assert_eq!(settings.render.bar_width, 8);
            },
        );
    }

    #[test]
    fn test_parse_cycle_command() {
        let cli = parse(&["cycle", "style", "prev"]);
        match cli.command {
            Some(Command::Cycle { axis, direction }) => {
                assert_eq!(axis, CycleAxis::Style);
                assert_eq!(direction, Some(CycleDirection::Down));
            }
            other => panic!("Expected Cycle, got {:?}", other),
        }

        let cli = parse(&["cycle", "display", "next"]);
        assert!(matches!(
            cli.command,
            Some(Command::Cycle {
                axis: CycleAxis::Display,
                direction: Some(CycleDirection::Up)
            })
        ));
    }

    #[test]
    fn test_unknown_cycle_axis_is_rejected() {
        let result = Config::try_parse_from(["quotabar", "cycle", "colour"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(parse(&[]).format, OutputFormat::Text);
        assert_eq!(parse(&["--format", "json"]).format, OutputFormat::Json);
    }
}
