use crate::error::{InstallerError, Result};
use std::fmt;
use std::str::FromStr;

/// Version normalization utilities
pub mod normalize {
    /// Strip the 'v' prefix if present
    /// Examples: "v0.3" -> "0.3", "0.3" -> "0.3"
    pub fn to_plain_version(version: &str) -> String {
        version.strip_prefix('v').unwrap_or(version).to_string()
    }

    /// Convert a plain version to the release tag format by adding 'v' prefix if needed
    /// Examples: "0.3" -> "v0.3", "v0.3" -> "v0.3"
    pub fn to_release_tag(version: &str) -> String {
        if version.starts_with('v') {
            version.to_string()
        } else {
            format!("v{version}")
        }
    }
}

/// Archive flavors published for each release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveFormat {
    #[default]
    Zip,
    TarGz,
}

impl ArchiveFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::Zip => ".zip",
            ArchiveFormat::TarGz => ".tar.gz",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension().trim_start_matches('.'))
    }
}

impl FromStr for ArchiveFormat {
    type Err = InstallerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zip" | ".zip" => Ok(ArchiveFormat::Zip),
            "tar.gz" | ".tar.gz" | "tgz" => Ok(ArchiveFormat::TarGz),
            other => Err(InstallerError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

/// A published release: which version, where it lives and in which format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseReference {
    version: String,
    base_url: String,
    format: ArchiveFormat,
}

impl ReleaseReference {
    pub fn new(version: &str, base_url: &str, format: ArchiveFormat) -> Result<Self> {
        validate_version(version)?;

        Ok(Self {
            version: normalize::to_plain_version(version),
            base_url: base_url.to_string(),
            format,
        })
    }

    /// Version without the tag prefix, as shown to the user.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn tag(&self) -> String {
        normalize::to_release_tag(&self.version)
    }

    pub fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// `<base_url><tag><extension>`, with no separator inserted.
    pub fn download_url(&self) -> String {
        format!("{}{}{}", self.base_url, self.tag(), self.format.extension())
    }
}

pub fn validate_version(version: &str) -> Result<()> {
    let plain = normalize::to_plain_version(version);
    if plain.is_empty() {
        return Err(InstallerError::InvalidVersion {
            version: version.to_string(),
        });
    }

    if plain.contains("..")
        || plain.contains('/')
        || plain.contains('\\')
        || plain.chars().any(char::is_whitespace)
    {
        return Err(InstallerError::InvalidVersion {
            version: version.to_string(),
        });
    }

    Ok(())
}
