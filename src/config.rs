use crate::cli::{Args, prompt_address};
use crate::errors::AppError;
use crate::retry::RetryPolicy;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Formatter};
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use url::Url;

#[derive(Clone, Debug)]
pub struct Config {
    pub address: String,
    pub api_base_url: Url,
    pub output: PathBuf,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub page_delay: Duration,
    pub request_timeout: Duration,
    pub log_level: Level,
}

#[derive(Debug, Clone, Copy, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, AppError> {
        let address = match args.address {
            Some(address) => address,
            None => prompt_address().map_err(|e| AppError::Config(e.to_string()))?,
        };

        let api_base_url = Url::parse(&args.api_base_url)?;

        if args.max_retries == 0 {
            return Err(AppError::Config("--max-retries must be at least 1".into()));
        }

        Ok(Self {
            address,
            api_base_url,
            output: args.output,
            max_retries: args.max_retries,
            retry_delay: Duration::from_secs(args.retry_delay),
            page_delay: Duration::from_secs(args.page_delay),
            request_timeout: Duration::from_secs(args.request_timeout),
            log_level: args.log_level.into(),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_retries,
            base_delay: self.retry_delay,
        }
    }
}
