use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::error;

use r53dump::backup::Backup;
use r53dump::error::Result;
use r53dump::provider::ZoneProvider;
use r53dump::provider::route53::Route53;
use r53dump::store::{DirStore, ObjectStore, S3Store};

mod config;
mod lambda;

const LAMBDA_RUNTIME_API_ENV: &str = "AWS_LAMBDA_RUNTIME_API";

/// Snapshots Route 53 hosted zones and their record sets into S3.
#[derive(Parser)]
#[clap(name = "r53dump", version)]
struct Args {
    /// YAML config file
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,

    #[clap(long, env = "BUCKET", global = true)]
    bucket: Option<String>,

    /// Key prefix of every snapshot [default: route53]
    #[clap(long, global = true)]
    prefix: Option<String>,

    #[clap(long, global = true)]
    region: Option<String>,

    /// Write snapshots below this directory instead of S3 (AWS credentials
    /// are still needed to read Route 53)
    #[clap(long, global = true)]
    output_dir: Option<PathBuf>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Subcommand)]
enum Command {
    /// Take one snapshot and exit
    Run,
    /// Serve the Lambda runtime API, one snapshot per invocation
    Lambda,
}

impl Args {
    fn mode(&self) -> Command {
        self.command.unwrap_or_else(|| {
            if std::env::var_os(LAMBDA_RUNTIME_API_ENV).is_some() {
                Command::Lambda
            } else {
                Command::Run
            }
        })
    }

    fn overrides(&self) -> config::Overrides {
        config::Overrides {
            bucket: self.bucket.clone(),
            prefix: self.prefix.clone(),
            region: self.region.clone(),
            output_dir: self.output_dir.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init_from_env(Env::new().default_filter_or("info"));

    let args = Args::parse();
    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let backup = build_backup(&settings).await;
    match args.mode() {
        Command::Run => run_once(&backup).await,
        Command::Lambda => match lambda::serve(backup).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("lambda runtime stopped: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn load_settings(args: &Args) -> Result<config::Settings> {
    let cfg = match &args.config {
        Some(path) => config::Parser::parse_yaml(path)?,
        None => config::Cfg::default(),
    };

    cfg.resolve(args.overrides())
}

async fn build_backup(settings: &config::Settings) -> Backup<Route53, Box<dyn ObjectStore>> {
    let sdk_config = r53dump::load_sdk_config(settings.region.clone()).await;

    let store: Box<dyn ObjectStore> = match &settings.sink {
        config::Sink::S3 { bucket } => Box::new(S3Store::new(&sdk_config, bucket.clone())),
        config::Sink::Dir(root) => Box::new(DirStore::new(root)),
    };

    Backup::new(Route53::new(&sdk_config), store)
        .with_prefix(settings.prefix.clone())
        .with_retry(settings.retry.clone())
}

async fn run_once<P, S>(backup: &Backup<P, S>) -> ExitCode
where
    P: ZoneProvider,
    S: ObjectStore,
{
    match backup.run(Utc::now()).await {
        Ok(report) if report.is_success() => ExitCode::SUCCESS,
        Ok(report) => {
            for failure in &report.failed {
                error!("{} ({}): {}", failure.zone_name, failure.zone_id, failure.error);
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("backup failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
