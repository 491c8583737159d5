use crate::core::release::ArchiveFormat;
use crate::error::{InstallerError, Result};
use crate::utils::fs;
use flate2::read::GzDecoder;
use log::{debug, warn};
use std::fs::File;
use std::path::Path;
use tar::Archive;
use zip::ZipArchive;

/// What an extraction wrote into the target directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    pub files: usize,
    pub directories: usize,
}

pub struct Extractor;

impl Default for Extractor {
    fn default() -> Self {
        Self
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self
    }

    /// Unpack `archive_path` into `destination`, keeping the archive's
    /// internal paths. Files already present are overwritten.
    pub fn extract(
        &self,
        archive_path: &Path,
        format: ArchiveFormat,
        destination: &Path,
    ) -> Result<ExtractionReport> {
        if !archive_path.exists() {
            return Err(InstallerError::MissingArchive {
                path: archive_path.to_path_buf(),
            });
        }

        fs::ensure_dir_exists(destination)?;
        debug!("Extracting {archive_path:?} ({format}) to {destination:?}");

        let report = match format {
            ArchiveFormat::Zip => self.extract_zip(archive_path, destination),
            ArchiveFormat::TarGz => self.extract_tar_gz(archive_path, destination),
        }
        .map_err(|e| InstallerError::extraction(destination, format!("{e:#}")))?;

        debug!(
            "Extracted {} files and {} directories",
            report.files, report.directories
        );
        Ok(report)
    }

    fn extract_tar_gz(
        &self,
        archive_path: &Path,
        destination: &Path,
    ) -> anyhow::Result<ExtractionReport> {
        let file = File::open(archive_path)?;
        let decoder = GzDecoder::new(file);
        let mut archive = Archive::new(decoder);
        let mut report = ExtractionReport::default();

        for entry in archive.entries()? {
            let mut entry = entry?;
            let entry_type = entry.header().entry_type();
            let entry_path = entry.path()?.into_owned();

            if !entry.unpack_in(destination)? {
                warn!("Skipping entry outside the target directory: {entry_path:?}");
                continue;
            }

            // Links and pax headers are not counted.
            if entry_type.is_dir() {
                report.directories += 1;
            } else if entry_type.is_file() {
                report.files += 1;
            }
        }
        Ok(report)
    }

    fn extract_zip(
        &self,
        archive_path: &Path,
        destination: &Path,
    ) -> anyhow::Result<ExtractionReport> {
        let file = File::open(archive_path)?;
        let mut archive = ZipArchive::new(file)?;
        let mut report = ExtractionReport::default();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let outpath = match file.enclosed_name() {
                Some(path) => destination.join(path),
                None => {
                    warn!("Skipping entry outside the target directory: {}", file.name());
                    continue;
                }
            };

            if file.is_dir() {
                std::fs::create_dir_all(&outpath)?;
                report.directories += 1;
                continue;
            }

            if let Some(p) = outpath.parent() {
                if !p.exists() {
                    std::fs::create_dir_all(p)?;
                }
            }
            let mut outfile = File::create(&outpath)?;
            std::io::copy(&mut file, &mut outfile)?;
            report.files += 1;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = file.unix_mode() {
                    std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))?;
                }
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Write;
    use std::path::Path;

    /// Build a zip archive; names ending in '/' become directory entries.
    pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        for (name, data) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, options).unwrap();
            } else {
                zip.start_file(*name, options).unwrap();
                zip.write_all(data.as_bytes()).unwrap();
            }
        }
        zip.finish().unwrap().into_inner()
    }

    pub fn write_tar_gz(path: &Path, entries: &[(&str, &str)]) {
        let file = std::fs::File::create(path).unwrap();
        let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            builder.append_data(&mut header, name, data.as_bytes()).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    /// Like `write_tar_gz`, but stores `name` verbatim, bypassing the
    /// builder's path checks.
    pub fn write_tar_gz_raw(path: &Path, entries: &[(&str, &str)]) {
        let file = std::fs::File::create(path).unwrap();
        let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.as_old_mut().name[..name.len()].copy_from_slice(name.as_bytes());
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_entry_type(tar::EntryType::Regular);
            header.set_cksum();
            builder.append(&header, data.as_bytes()).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }
}
