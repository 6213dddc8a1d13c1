//! Single-file HTTP GET that writes the body to disk on success.
//!
//! Uses the curl crate (libcurl). The body is staged in `<dest>.part` and
//! renamed into place once complete, so a failed transfer or write never
//! leaves a partial destination file behind.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Status that counts as a successful download.
const HTTP_OK: u32 = 200;

/// What happened to one planned file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Body written to the destination.
    Downloaded { bytes: u64 },
    /// Server answered with a non-success status; nothing written.
    HttpStatus(u32),
}

/// Blocking fetch of one URL into one destination path.
///
/// Implementations are shared across worker threads.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str, dest: &Path) -> Result<FetchOutcome>;
}

/// libcurl-backed fetcher: one GET per call, redirects followed, no timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlFetcher;

impl Fetcher for CurlFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<FetchOutcome> {
        let part = PartFile::create(dest)?;
        let result = get_into(url, &part);
        match result {
            Ok((HTTP_OK, bytes)) => {
                part.finalize()?;
                Ok(FetchOutcome::Downloaded { bytes })
            }
            Ok((code, _)) => {
                part.discard();
                Ok(FetchOutcome::HttpStatus(code))
            }
            Err(e) => {
                part.discard();
                Err(e)
            }
        }
    }
}

/// Runs the GET, streaming the body into `part`. Returns (status, bytes written).
fn get_into(url: &str, part: &PartFile) -> Result<(u32, u64)> {
    let mut file = part.file.try_clone().context("clone part file handle")?;
    let mut written: u64 = 0;
    let mut write_err: Option<std::io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                write_err = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        let performed = transfer.perform();
        drop(transfer);
        if let Some(e) = write_err.take() {
            return Err(e).with_context(|| format!("write {}", part.path.display()));
        }
        performed.with_context(|| format!("GET {} failed", url))?;
    }

    let code = easy.response_code().context("no response code")?;
    file.flush().with_context(|| format!("flush {}", part.path.display()))?;
    Ok((code, written))
}

/// Temp file next to the final destination.
struct PartFile {
    file: File,
    path: PathBuf,
    dest: PathBuf,
}

impl PartFile {
    fn create(dest: &Path) -> Result<Self> {
        let mut name = dest.as_os_str().to_os_string();
        name.push(".part");
        let path = PathBuf::from(name);
        let file = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        Ok(Self {
            file,
            path,
            dest: dest.to_path_buf(),
        })
    }

    /// Rename into place, replacing any existing destination.
    fn finalize(self) -> Result<()> {
        self.file
            .sync_all()
            .with_context(|| format!("sync {}", self.path.display()))?;
        drop(self.file);
        std::fs::rename(&self.path, &self.dest).with_context(|| {
            format!(
                "failed to rename {} to {}",
                self.path.display(),
                self.dest.display()
            )
        })?;
        Ok(())
    }

    fn discard(self) {
        drop(self.file);
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::debug!(path = %self.path.display(), "could not remove part file: {}", e);
        }
    }
}
