use crate::core::checksum::Sha256Digest;
use crate::core::config::InstallConfig;
use crate::core::download::{Fetcher, HttpClient, UreqClient};
use crate::core::extract::{ExtractionReport, Extractor};
use crate::error::Result;
use crate::utils::{fs, output};
use log::{debug, warn};
use std::io::Write;

/// Where a setup run stands. Runs only move forward; `Failed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupState {
    Pending,
    Downloaded,
    Extracted,
    Failed,
}

impl SetupState {
    /// The state reached when the current step succeeds.
    pub fn advance(self) -> Self {
        match self {
            SetupState::Pending => SetupState::Downloaded,
            SetupState::Downloaded | SetupState::Extracted => SetupState::Extracted,
            SetupState::Failed => SetupState::Failed,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SetupState::Extracted | SetupState::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupOutcome {
    pub state: SetupState,
    pub report: ExtractionReport,
    pub archive_size: u64,
    pub archive_sha256: Sha256Digest,
}

/// Download the configured release and extract it into the target directory.
pub fn run_setup(config: &InstallConfig, out: &mut dyn Write) -> Result<SetupOutcome> {
    let client = UreqClient::new(config.insecure, config.timeout);
    run_setup_with(config, client, out)
}

pub fn run_setup_with<C: HttpClient>(
    config: &InstallConfig,
    client: C,
    out: &mut dyn Write,
) -> Result<SetupOutcome> {
    let release = &config.release;
    let target = &config.target_dir;

    output::banner(
        out,
        &format!(
            "This program will help you to install Fennec CMS v.{}",
            release.version()
        ),
    )?;

    // Created up front, so a failed download leaves an empty target behind.
    fs::ensure_dir_exists(target)?;

    let fetcher = Fetcher::new(client, config.staging_dir())
        .with_expected_sha256(config.expected_sha256.clone());
    let extractor = Extractor::new();
    let mut state = SetupState::Pending;

    let archive = run_action(out, &mut state, "Downloading release file...", || {
        fetcher.fetch(release)
    })?;

    let report = run_action(
        out,
        &mut state,
        &format!("Extracting Fennec CMS to {}", target.display()),
        || extractor.extract(archive.path(), archive.format(), target),
    )?;

    let archive_size = archive.size();
    let archive_sha256 = archive.sha256().clone();
    if let Err(e) = archive.close() {
        warn!("Could not remove staged archive: {e}");
    }

    output::info(
        out,
        &format!(
            "Installed {} files into {}",
            report.files,
            target.display()
        ),
    )?;

    Ok(SetupOutcome {
        state,
        report,
        archive_size,
        archive_sha256,
    })
}

/// Print `message`, run `action`, then mark the line with the result.
fn run_action<T>(
    out: &mut dyn Write,
    state: &mut SetupState,
    message: &str,
    action: impl FnOnce() -> Result<T>,
) -> Result<T> {
    output::step(out, message)?;

    match action() {
        Ok(value) => {
            output::success(out)?;
            *state = state.advance();
            Ok(value)
        }
        Err(e) => {
            output::failure(out)?;
            debug!("Setup failed after reaching {state:?}");
            *state = SetupState::Failed;
            Err(e)
        }
    }
}
