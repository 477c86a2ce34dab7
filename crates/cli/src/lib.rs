mod mounts;
mod render;
mod serve;

use clap::{Args, Parser, Subcommand};
use quarkboard_core::config::{AppConfig, ServerOverrides};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "quarkboard",
    version,
    about = "A pluggable dashboard server",
    long_about = "Quarkboard serves a single HTML page assembled from a template and an ordered \
                  list of plugins. Each plugin contributes scripts, stylesheets and markup, and \
                  exposes its asset directories under /<plugin>/<category>/."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the dashboard server
    #[command(
        long_about = "Loads the template and every configured plugin, then serves the composed \
                      page at / until interrupted with Ctrl-C."
    )]
    Serve {
        #[command(flatten)]
        boot: BootArgs,
    },
    /// Compose the page once and print it
    Render {
        #[command(flatten)]
        boot: BootArgs,

        /// Write the page to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// List the static asset mounts
    Mounts {
        #[command(flatten)]
        boot: BootArgs,

        /// Show which file a request path would be served from
        #[arg(long, value_name = "URL_PATH")]
        resolve: Option<String>,
    },
}

/// Settings shared by every subcommand. Flags override the config file.
#[derive(Args, Debug, Default)]
pub struct BootArgs {
    /// JSON config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Host name to bind
    #[arg(short = 'H', long)]
    pub hostname: Option<String>,

    /// Port to bind
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Serve over HTTPS (needs --private-key and --certificate)
    #[arg(long)]
    pub https: bool,

    /// PEM private key for HTTPS
    #[arg(long, value_name = "FILE")]
    pub private_key: Option<PathBuf>,

    /// PEM certificate for HTTPS
    #[arg(long, value_name = "FILE")]
    pub certificate: Option<PathBuf>,

    /// Page template
    #[arg(short, long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Plugin directory, appended after the configured plugins. Repeatable.
    #[arg(long = "plugin", value_name = "DIR")]
    pub plugins: Vec<PathBuf>,
}

impl BootArgs {
    pub fn into_config(self) -> anyhow::Result<AppConfig> {
        let mut config = AppConfig::load_or_default(self.config.as_deref())?;
        config.apply(ServerOverrides {
            hostname: self.hostname,
            port: self.port,
            https: self.https.then_some(true),
            private_key: self.private_key,
            certificate: self.certificate,
            template: self.template,
            plugins: self.plugins,
        });
        Ok(config)
    }
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // render and mounts write to stdout, so they log to file only
    let (component, to_stderr) = match &cli.command {
        Commands::Serve { .. } => ("serve", true),
        Commands::Render { .. } => ("render", false),
        Commands::Mounts { .. } => ("mounts", false),
    };
    let _guard = quarkboard_runtime::init_logging(component, to_stderr);

    match cli.command {
        Commands::Serve { boot } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(serve::run(boot.into_config()?))
        }
        Commands::Render { boot, output } => render::run(boot.into_config()?, output),
        Commands::Mounts { boot, resolve } => mounts::run(boot.into_config()?, resolve),
    }
}
