use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use fennec_installer::core::checksum::Sha256Digest;
use fennec_installer::core::config::{InstallConfig, DEFAULT_VERSION, RELEASE_URL};
use fennec_installer::core::release::ReleaseReference;
use fennec_installer::{commands, error, utils::output};

#[derive(Parser)]
#[clap(name = "fennec")]
#[clap(about = "Command line installer for Fennec CMS")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Show debug output
    #[clap(short, long, global = true)]
    verbose: bool,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download and setup Fennec CMS
    #[clap(name = "cms:setup", alias = "setup")]
    Setup(SetupArgs),
}

#[derive(Args)]
struct SetupArgs {
    /// Target directory to install CMS
    #[clap(short, long)]
    target: PathBuf,
    /// Fennec CMS version to install (e.g., 0.3 or v0.3)
    #[clap(long, default_value = DEFAULT_VERSION)]
    release: String,
    /// Base URL the release tag is appended to
    #[clap(long, default_value = RELEASE_URL)]
    base_url: String,
    /// Archive format: zip or tar.gz
    #[clap(long, default_value = "zip")]
    format: String,
    /// Expected SHA-256 of the release archive
    #[clap(long)]
    sha256: Option<String>,
    /// Skip TLS certificate verification
    #[clap(long)]
    insecure: bool,
    /// Give up on the download after this many seconds
    #[clap(long)]
    timeout: Option<u64>,
}

impl SetupArgs {
    fn to_config(&self) -> error::Result<InstallConfig> {
        let release = ReleaseReference::new(&self.release, &self.base_url, self.format.parse()?)?;
        let expected_sha256: Option<Sha256Digest> =
            self.sha256.as_deref().map(str::parse).transpose()?;

        Ok(InstallConfig::new(&self.target)?
            .with_release(release)
            .with_insecure(self.insecure)
            .with_timeout(self.timeout.map(Duration::from_secs))
            .with_expected_sha256(expected_sha256))
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Setup(args) => args
            .to_config()
            .and_then(|config| commands::setup::run_setup(&config, &mut std::io::stdout()))
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!(e)),
    };

    if let Err(e) = result {
        let _ = output::error_line(&mut std::io::stderr(), &e);
        std::process::exit(1);
    }

    Ok(())
}
