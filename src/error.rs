use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, InstallerError>;

/// Why a release download did not produce an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadFailure {
    /// The server answered with something other than 200.
    Status(u16),
    /// The request never completed (DNS, TLS, connection reset, body read).
    Transport(String),
}

impl fmt::Display for DownloadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadFailure::Status(code) => write!(f, "server returned code {code}"),
            DownloadFailure::Transport(reason) => write!(f, "{reason}"),
        }
    }
}

#[derive(Error, Debug)]
pub enum InstallerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unable to download release from {url}: {cause}")]
    Download { url: String, cause: DownloadFailure },

    #[error("Unable to download release: {path} dir is not writable: {reason}")]
    StagingDirNotWritable { path: PathBuf, reason: String },

    #[error("Release file not found: {path}")]
    MissingArchive { path: PathBuf },

    #[error("Cannot extract Fennec CMS to {path}: {reason}")]
    Extraction { path: PathBuf, reason: String },

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Invalid SHA-256 digest: '{value}'")]
    InvalidChecksum { value: String },

    #[error("Invalid version format: '{version}'")]
    InvalidVersion { version: String },

    #[error("Unsupported archive format: '{format}'")]
    UnsupportedFormat { format: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },
}

impl InstallerError {
    pub fn status<S: Into<String>>(url: S, code: u16) -> Self {
        InstallerError::Download {
            url: url.into(),
            cause: DownloadFailure::Status(code),
        }
    }

    pub fn transport<S: Into<String>, R: ToString>(url: S, reason: R) -> Self {
        InstallerError::Download {
            url: url.into(),
            cause: DownloadFailure::Transport(reason.to_string()),
        }
    }

    pub fn extraction<P: Into<PathBuf>, R: ToString>(path: P, reason: R) -> Self {
        InstallerError::Extraction {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
