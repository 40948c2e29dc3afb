use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use siteline_core::{
    is_valid_website_key, ClientConfig, ConfigError, PageviewData, PartialOptions, Siteline,
    SitelineOptions,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;

#[derive(Parser)]
#[command(name = "siteline", version, about = "Siteline pageview beacon CLI")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that a website key has the expected format
    CheckKey {
        /// Key to check
        key: String,
    },
    /// Send a single pageview and wait for the result
    Track {
        #[arg(long)]
        url: String,
        #[arg(long, default_value = "GET")]
        method: String,
        #[arg(long, default_value_t = 200, allow_negative_numbers = true)]
        status: i64,
        /// Request duration in milliseconds
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        duration: f64,
        #[arg(long)]
        user_agent: Option<String>,
        #[arg(long)]
        referer: Option<String>,
        #[arg(long)]
        ip: Option<String>,
        #[command(flatten)]
        options: ConfigArgs,
    },
    /// Show the resolved configuration
    Config {
        #[command(flatten)]
        options: ConfigArgs,
    },
}

#[derive(Args)]
struct ConfigArgs {
    #[arg(long)]
    website_key: Option<String>,
    #[arg(long)]
    endpoint: Option<String>,
    /// Print diagnostics to stderr
    #[arg(long, overrides_with = "no_debug")]
    debug: bool,
    /// Turn diagnostics off even when a config file or the environment enables them
    #[arg(long, overrides_with = "debug")]
    no_debug: bool,
    /// Extra TOML file with a `[siteline]` table
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl ConfigArgs {
    fn flags(&self) -> PartialOptions {
        PartialOptions {
            website_key: self.website_key.clone(),
            endpoint: self.endpoint.clone(),
            debug: self.debug_flag(),
            ..Default::default()
        }
    }

    /// `None` leaves the decision to files and the environment
    fn debug_flag(&self) -> Option<bool> {
        match (self.debug, self.no_debug) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    fn resolve(&self) -> Result<SitelineOptions> {
        let options = config::load_options(self.flags(), self.config.as_deref())?;
        let Some(options) = options.into_options() else {
            bail!("Missing websiteKey in config or environment");
        };
        Ok(options)
    }
}

fn init_logging(debug: bool) {
    let default_directive = if debug { "siteline=info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::CheckKey { key } => {
            if !is_valid_website_key(&key) {
                bail!(ConfigError::InvalidWebsiteKey);
            }
            println!("valid");
        }
        Command::Track {
            url,
            method,
            status,
            duration,
            user_agent,
            referer,
            ip,
            options,
        } => {
            let options = options.resolve()?;
            init_logging(options.debug);

            let mut pageview = PageviewData::new(url, method, status, duration);
            pageview.user_agent = user_agent;
            pageview.referer = referer;
            pageview.ip = ip;

            let client = Siteline::new(options)?;
            client.send(pageview).await?;
            println!("sent");
        }
        Command::Config { options } => {
            let config = ClientConfig::validate(options.resolve()?)?;
            println!("websiteKey: {}", config.masked_website_key());
            println!("endpoint: {}", config.endpoint());
            println!("debug: {}", config.debug());
            println!("sdk: {}", config.sdk());
            println!("sdkVersion: {}", config.sdk_version());
            println!("integrationType: {}", config.integration_type());
        }
    }
    Ok(())
}
