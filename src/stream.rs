//! Line-oriented file access with transparent gzip.
//!
//! Compression is chosen by a `.gz` suffix on the path. Inputs are decoded with a
//! multi-member decoder so BGZF-compressed VCFs read through to the end.
//!
//! Output goes to a temporary file next to the destination and is renamed onto
//! it by [`OutputFile::commit`]. Dropping an uncommitted [`OutputFile`] removes
//! the temporary file, so a failed run never leaves a truncated output behind.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::Error;

/// Check if a path names a gzip-compressed file
#[must_use]
pub fn is_gzipped(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"))
}

/// Open a text or gzip input for buffered line reading
///
/// # Errors
///
/// Returns `Error::Configuration` if the file cannot be opened.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>, Error> {
    let file = File::open(path).map_err(|e| {
        Error::configuration(format!("Cannot open input '{}': {e}", path.display()))
    })?;

    debug!(path = %path.display(), gzip = is_gzipped(path), "Opened input");

    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

enum Sink {
    Plain(BufWriter<NamedTempFile>),
    Gzip(GzEncoder<BufWriter<NamedTempFile>>),
}

/// An output file that only appears at its path once committed
pub struct OutputFile {
    path: PathBuf,
    sink: Sink,
}

impl OutputFile {
    /// Start writing `path`, compressing when it ends in `.gz`
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the destination directory is not writable.
    pub fn create(path: &Path) -> Result<Self, Error> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let temp = tempfile::Builder::new()
            .prefix(".vcf-reheader-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| {
                Error::configuration(format!(
                    "Cannot create output in '{}': {e}",
                    dir.display()
                ))
            })?;

        debug!(path = %path.display(), temp = %temp.path().display(), "Created output");

        let writer = BufWriter::new(temp);
        let sink = if is_gzipped(path) {
            Sink::Gzip(GzEncoder::new(writer, Compression::default()))
        } else {
            Sink::Plain(writer)
        };

        Ok(Self {
            path: path.to_path_buf(),
            sink,
        })
    }

    /// Finish compression, flush, and move the file into place
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if flushing or renaming fails; the temporary file is
    /// removed in that case.
    pub fn commit(self) -> Result<PathBuf, Error> {
        let writer = match self.sink {
            Sink::Plain(writer) => writer,
            Sink::Gzip(encoder) => encoder.finish()?,
        };
        let temp = writer.into_inner().map_err(io::IntoInnerError::into_error)?;

        temp.as_file().sync_all()?;
        set_output_permissions(&temp)?;
        temp.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), "Committed output");
        Ok(self.path)
    }
}

#[cfg(unix)]
fn set_output_permissions(temp: &NamedTempFile) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    // Temporary files are owner-only; outputs follow the usual file mode
    std::fs::set_permissions(temp.path(), std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_output_permissions(_temp: &NamedTempFile) -> io::Result<()> {
    Ok(())
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.sink {
            Sink::Plain(w) => w.write(buf),
            Sink::Gzip(w) => w.write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match &mut self.sink {
            Sink::Plain(w) => w.write_all(buf),
            Sink::Gzip(w) => w.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.sink {
            Sink::Plain(w) => w.flush(),
            Sink::Gzip(w) => w.flush(),
        }
    }
}
