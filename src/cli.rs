//! Argument groups shared by the command-line tools.

use clap::Args;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
  /// Base URL of the Dataverse installation, e.g. https://demo.dataverse.org
  #[arg(long, env = "DATAVERSE_SERVER")]
  pub server: String,

  /// API token, for datasets only visible to a logged-in account
  #[arg(long, env = "DATAVERSE_API_TOKEN", hide_env_values = true)]
  pub api_token: Option<String>,
}

impl ServerArgs {
  pub fn to_config(&self) -> ServerConfig {
    ServerConfig::new(&self.server, self.api_token.clone())
  }
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct LogArgs {
  /// More output, repeat for more (-v, -vv)
  #[arg(long, short, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Only report errors, and hide progress bars
  #[arg(long, short)]
  pub quiet: bool,
}

impl LogArgs {
  fn level(&self) -> &'static str {
    if self.quiet {
      return "error";
    }
    match self.verbose {
      0 => "info",
      1 => "debug",
      _ => "trace",
    }
  }

  pub fn show_progress(&self) -> bool {
    !self.quiet
  }

  /// Logs go to stderr; `RUST_LOG` takes precedence over the flags.
  pub fn init(&self) {
    let filter = EnvFilter::try_from_default_env()
      .unwrap_or_else(|_| EnvFilter::new(format!("dataverse_util={}", self.level())));
    let _ = tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(std::io::stderr)
      .with_target(false)
      .try_init();
  }
}
