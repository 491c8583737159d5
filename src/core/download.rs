use crate::core::checksum::{self, Sha256Digest};
use crate::core::release::{ArchiveFormat, ReleaseReference};
use crate::error::{InstallerError, Result};
use log::{debug, warn};
use sha2::{Digest, Sha256};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempPath;

/// Status line and body of a completed HTTP exchange.
pub struct HttpResponse {
    pub status: u16,
    pub body: Box<dyn Read>,
}

/// Blocking HTTP GET. Redirects are followed by the implementation; any
/// status, including errors, is handed back as data.
pub trait HttpClient {
    fn get(&self, url: &str) -> Result<HttpResponse>;
}

impl<T: HttpClient + ?Sized> HttpClient for &T {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        (**self).get(url)
    }
}

/// Production client backed by a `ureq` agent.
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    pub fn new(insecure: bool, timeout: Option<Duration>) -> Self {
        let mut builder = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout);

        if insecure {
            warn!("TLS certificate verification is disabled");
            builder = builder.tls_config(
                ureq::tls::TlsConfig::builder()
                    .disable_verification(true)
                    .build(),
            );
        }

        Self {
            agent: ureq::Agent::new_with_config(builder.build()),
        }
    }
}

impl HttpClient for UreqClient {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| InstallerError::transport(url, e))?;

        Ok(HttpResponse {
            status: response.status().as_u16(),
            body: Box::new(response.into_body().into_reader()),
        })
    }
}

/// A release archive staged on disk. The file is removed when this value is
/// dropped, whichever way the setup run ends.
#[derive(Debug)]
pub struct DownloadedArchive {
    path: TempPath,
    format: ArchiveFormat,
    size: u64,
    sha256: Sha256Digest,
}

impl DownloadedArchive {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ArchiveFormat {
        self.format
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn sha256(&self) -> &Sha256Digest {
        &self.sha256
    }

    /// Remove the staged file now and report failures instead of ignoring them.
    pub fn close(self) -> Result<()> {
        self.path.close()?;
        Ok(())
    }
}

pub struct Fetcher<C: HttpClient> {
    client: C,
    staging_dir: PathBuf,
    expected_sha256: Option<Sha256Digest>,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new<P: Into<PathBuf>>(client: C, staging_dir: P) -> Self {
        Self {
            client,
            staging_dir: staging_dir.into(),
            expected_sha256: None,
        }
    }

    pub fn with_expected_sha256(mut self, digest: Option<Sha256Digest>) -> Self {
        self.expected_sha256 = digest;
        self
    }

    pub fn fetch(&self, release: &ReleaseReference) -> Result<DownloadedArchive> {
        let url = release.download_url();
        debug!("GET {url}");

        let mut response = self.client.get(&url)?;
        if response.status != 200 {
            return Err(InstallerError::status(url, response.status));
        }

        let mut file = tempfile::Builder::new()
            .prefix(&format!("fennec-{}-", release.tag()))
            .suffix(release.format().extension())
            .tempfile_in(&self.staging_dir)
            .map_err(|e| InstallerError::StagingDirNotWritable {
                path: self.staging_dir.clone(),
                reason: e.kind().to_string(),
            })?;
        debug!("Staging archive at {:?}", file.path());

        // The temp file is deleted on every early return below.
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; 8192];
        let mut size = 0u64;
        loop {
            let bytes_read = match response.body.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(InstallerError::transport(url, e)),
            };
            hasher.update(&buffer[..bytes_read]);
            file.write_all(&buffer[..bytes_read])?;
            size += bytes_read as u64;
        }
        file.flush()?;

        let sha256 = Sha256Digest::from_hasher(hasher);
        debug!("Downloaded {size} bytes, sha256 {sha256}");

        let archive = DownloadedArchive {
            path: file.into_temp_path(),
            format: release.format(),
            size,
            sha256,
        };

        if let Some(expected) = &self.expected_sha256 {
            checksum::verify(expected, archive.sha256())?;
        }

        Ok(archive)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::cell::RefCell;
    use std::io::Cursor;

    /// Answers every request with the same canned status and body.
    pub struct StubClient {
        pub status: u16,
        pub body: Vec<u8>,
        pub requests: RefCell<Vec<String>>,
    }

    impl StubClient {
        pub fn new(status: u16, body: Vec<u8>) -> Self {
            Self {
                status,
                body,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl HttpClient for StubClient {
        fn get(&self, url: &str) -> Result<HttpResponse> {
            self.requests.borrow_mut().push(url.to_string());
            Ok(HttpResponse {
                status: self.status,
                body: Box::new(Cursor::new(self.body.clone())),
            })
        }
    }

    /// Yields a few bytes and then fails like a dropped connection.
    pub struct BrokenBody {
        pub sent: bool,
    }

    impl Read for BrokenBody {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.sent {
                return Err(std::io::Error::new(
                    ErrorKind::ConnectionReset,
                    "connection reset by peer",
                ));
            }
            self.sent = true;
            buf[..2].copy_from_slice(b"PK");
            Ok(2)
        }
    }

    pub struct BrokenClient;

    impl HttpClient for BrokenClient {
        fn get(&self, _url: &str) -> Result<HttpResponse> {
            Ok(HttpResponse {
                status: 200,
                body: Box::new(BrokenBody { sent: false }),
            })
        }
    }

    pub struct UnreachableClient;

    impl HttpClient for UnreachableClient {
        fn get(&self, url: &str) -> Result<HttpResponse> {
            Err(InstallerError::transport(url, "dns error: no such host"))
        }
    }
}
