use crate::AppError;
use crate::address::{AddressInfo, AddressType};
use crate::config::{Config, LogLevel};

use anyhow::{Error, Result, anyhow};
use clap::{CommandFactory, ValueEnum};
use clap::{Parser, arg, command};
use inquire::validator::{ErrorMessage, Validation};
use inquire::{Select, Text};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use twelf::{Layer, config};

static SHOULD_SKIP_SERIALIZING_FIELDS: AtomicBool = AtomicBool::new(false);

fn should_skip_serializing_fields<T>(_: &T) -> bool {
    SHOULD_SKIP_SERIALIZING_FIELDS.load(Ordering::SeqCst)
}

#[derive(Parser, Debug, Serialize, Clone)]
#[command(author, version, about, long_about = None)]
#[config]
pub struct Args {
    /// Bitcoin address to fetch history for; prompted for when absent
    #[arg(long)]
    pub address: Option<String>,

    #[arg(long, default_value = "https://blockchain.info/rawaddr")]
    pub api_base_url: String,

    #[arg(long, default_value = "transaction_ids.txt")]
    pub output: PathBuf,

    /// Attempts per page, including the first one
    #[arg(long, default_value = "3")]
    pub max_retries: u32,

    /// Base retry delay in seconds; the wait before retry k is k times this
    #[arg(long, default_value = "1")]
    pub retry_delay: u64,

    /// Seconds to wait between successive page requests
    #[arg(long, default_value = "1")]
    pub page_delay: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "10")]
    pub request_timeout: u64,

    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,

    #[arg(long, help = "Initialize a new configuration file")]
    #[serde(skip_serializing_if = "should_skip_serializing_fields")]
    #[serde(default)]
    init: bool,

    #[arg(long, help = "Path to an existing configuration file")]
    #[serde(skip_serializing_if = "should_skip_serializing_fields")]
    config: Option<PathBuf>,
}

fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .expect("Could not determine config directory")
        .join("txfetch")
        .join("config.toml")
}

impl Args {
    fn parse_args(config_path: PathBuf) -> Result<Args, AppError> {
        const ENV_PREFIX: &str = "TXFETCH_";

        let matches = Self::command().get_matches();

        let mut config_layers = vec![
            Layer::Env(Some(String::from(ENV_PREFIX))),
            Layer::Clap(matches),
        ];
        if config_path.exists() {
            config_layers.insert(0, Layer::Toml(config_path.clone()));
        }

        Self::with_layers(&config_layers).map_err(|e| match e {
            twelf::Error::Toml(_) => AppError::Config(format!(
                "Failed to parse config file '{}'",
                config_path.to_string_lossy()
            )),
            _ => AppError::Config(e.to_string()),
        })
    }

    pub fn init() -> Result<Config, AppError> {
        let initial_args = Args::parse();
        let config_path = initial_args.config.unwrap_or_else(get_config_path);

        let arguments = Args::parse_args(config_path)?;

        SHOULD_SKIP_SERIALIZING_FIELDS.store(true, Ordering::SeqCst);

        if arguments.init {
            Args::generate_config().map_err(|e| AppError::Config(e.to_string()))?;
        }

        match arguments.config {
            Some(path) => Config::from_args(Args::parse_args(path)?),
            None => Config::from_args(arguments),
        }
    }

    fn enum_prompt<T: std::fmt::Debug>(
        message: &str,
        enum_values: &[T],
        starting_cursor: usize,
    ) -> Result<String> {
        Select::new(
            message,
            enum_values
                .iter()
                .map(|it| format!("{it:?}"))
                .collect::<Vec<_>>(),
        )
        .with_starting_cursor(starting_cursor)
        .prompt()
        .map_err(|e| anyhow!(e))
    }

    fn to_file(&self, file_path: &PathBuf) -> Result<()> {
        let toml_string = toml::to_string(self).map_err(Error::new)?;
        let mut file = fs::File::create(file_path)?;
        file.write_all(toml_string.as_bytes())?;
        Ok(())
    }

    fn generate_config() -> Result<()> {
        let api_base_url = Text::new("Explorer rawaddr endpoint:")
            .with_default("https://blockchain.info/rawaddr")
            .with_validator(|input: &str| {
                input.parse::<url::Url>().map(|_| Validation::Valid).or_else(|_| {
                    Ok(Validation::Invalid(ErrorMessage::Custom(
                        "Invalid URL".into(),
                    )))
                })
            })
            .prompt()?;

        let output = Text::new("Output file for transaction ids:")
            .with_default("transaction_ids.txt")
            .with_validator(|input: &str| {
                if input.is_empty() {
                    Ok(Validation::Invalid(ErrorMessage::Custom(
                        "Invalid path.".into(),
                    )))
                } else {
                    Ok(Validation::Valid)
                }
            })
            .prompt()?;

        let max_retries = Text::new("Attempts per page:")
            .with_default("3")
            .with_validator(|input: &str| match input.parse::<u32>() {
                Ok(n) if n >= 1 => Ok(Validation::Valid),
                _ => Ok(Validation::Invalid(ErrorMessage::Custom(
                    "Must be a number of at least 1".into(),
                ))),
            })
            .prompt()
            .map_err(|e| anyhow!(e))
            .and_then(|it| it.parse::<u32>().map_err(|e| anyhow!(e)))?;

        let log_level = Args::enum_prompt(
            "What should be the log level?",
            LogLevel::value_variants(),
            2,
        )
        .and_then(|it| LogLevel::from_str(it.as_str(), true).map_err(|e| anyhow!(e)))?;

        let app_config = Args {
            init: false,
            config: None,
            address: None,
            api_base_url,
            output: output.into(),
            max_retries,
            retry_delay: 1,
            page_delay: 1,
            request_timeout: 10,
            log_level,
        };

        let config_path = get_config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        app_config.to_file(&config_path)?;
        println!("\nConfig has been written to {config_path:?}");

        std::process::exit(0);
    }
}

/// Interactive fallback when no address was given via flag, env, or config
/// file. The validator rejects anything that matches neither address shape.
pub fn prompt_address() -> Result<String> {
    Text::new("Enter a Bitcoin address:")
        .with_validator(|input: &str| {
            if AddressInfo::get_address_type(input) == AddressType::Invalid {
                Ok(Validation::Invalid(ErrorMessage::Custom(
                    "Not a recognized Bitcoin address".into(),
                )))
            } else {
                Ok(Validation::Valid)
            }
        })
        .prompt()
        .map_err(|e| anyhow!(e))
}
