use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use r53dump::backup::key::DEFAULT_PREFIX;
use r53dump::error::Error;
use r53dump::error::Result;
use r53dump::retry::{DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY_MS, RetryPolicy};

////////////////////////////////////////////////////////////
// Retry
////////////////////////////////////////////////////////////
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CfgRetry {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for CfgRetry {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
        }
    }
}

impl From<CfgRetry> for RetryPolicy {
    fn from(cfg: CfgRetry) -> Self {
        RetryPolicy::new(
            cfg.max_attempts,
            Duration::from_millis(cfg.base_delay_ms),
            Duration::from_millis(cfg.max_delay_ms),
        )
    }
}

////////////////////////////////////////////////////////////
// Yaml parser
////////////////////////////////////////////////////////////
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Cfg {
    #[serde(default)]
    pub bucket: Option<String>,

    #[serde(default = "default_prefix")]
    pub prefix: String,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub retry: CfgRetry,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

impl Default for Cfg {
    fn default() -> Self {
        Self {
            bucket: None,
            prefix: default_prefix(),
            region: None,
            retry: CfgRetry::default(),
        }
    }
}

pub struct Parser;

impl Parser {
    pub fn parse_yaml<P: AsRef<Path>>(path: P) -> Result<Cfg> {
        let reader = Self::file_reader(path)?;
        let config: Cfg = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    fn file_reader<P: AsRef<Path>>(path: P) -> Result<BufReader<File>> {
        let f = std::fs::File::open(path)?;
        Ok(BufReader::new(f))
    }
}

////////////////////////////////////////////////////////////
// Settings
////////////////////////////////////////////////////////////

/// Values given on the command line or through the environment; they win
/// over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bucket: Option<String>,
    pub prefix: Option<String>,
    pub region: Option<String>,
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sink {
    S3 { bucket: String },
    Dir(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub sink: Sink,
    pub prefix: String,
    pub region: Option<String>,
    pub retry: RetryPolicy,
}

impl Cfg {
    pub fn resolve(self, overrides: Overrides) -> Result<Settings> {
        let bucket = overrides
            .bucket
            .filter(|b| !b.is_empty())
            .or(self.bucket.filter(|b| !b.is_empty()));

        let sink = match (overrides.output_dir, bucket) {
            (Some(dir), _) => Sink::Dir(dir),
            (None, Some(bucket)) => Sink::S3 { bucket },
            (None, None) => {
                return Err(Error::ConfigError(
                    "no bucket configured: set BUCKET, pass --bucket or --output-dir, or add `bucket` to the config file".to_string(),
                ));
            }
        };

        Ok(Settings {
            sink,
            prefix: overrides.prefix.unwrap_or(self.prefix),
            region: overrides.region.or(self.region),
            retry: self.retry.into(),
        })
    }
}

////////////////////////////////////////////////////////////
// Unit test
////////////////////////////////////////////////////////////
#[cfg(test)]
#[path = "config_test.rs"]
mod test;
