use crate::core::checksum::Sha256Digest;
use crate::core::release::{ArchiveFormat, ReleaseReference};
use crate::error::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fennec CMS version installed when none is requested
pub const DEFAULT_VERSION: &str = "0.3";

/// GitHub base URL for release downloads
pub const RELEASE_URL: &str = "https://github.com/Fennec-CMS/fennec/archive/";

/// Everything one setup run needs to know. Nothing here is persisted.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    pub release: ReleaseReference,
    pub target_dir: PathBuf,
    pub insecure: bool,
    pub timeout: Option<Duration>,
    pub expected_sha256: Option<Sha256Digest>,
    /// Where the archive is staged; the system temp dir when unset.
    pub staging_dir: Option<PathBuf>,
}

impl InstallConfig {
    pub fn new<P: AsRef<Path>>(target_dir: P) -> Result<Self> {
        Ok(InstallConfig {
            release: ReleaseReference::new(DEFAULT_VERSION, RELEASE_URL, ArchiveFormat::Zip)?,
            target_dir: target_dir.as_ref().to_path_buf(),
            insecure: false,
            timeout: None,
            expected_sha256: None,
            staging_dir: None,
        })
    }

    pub fn with_release(mut self, release: ReleaseReference) -> Self {
        self.release = release;
        self
    }

    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_expected_sha256(mut self, digest: Option<Sha256Digest>) -> Self {
        self.expected_sha256 = digest;
        self
    }

    pub fn with_staging_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.staging_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
