//! Savestate file streams
//!
//! Savestates are gzip-compressed. Input files that are not gzip are read
//! as raw streams. Output is staged in a temporary file next to the
//! destination and only renamed over it once the whole stream is written,
//! so a failed run never replaces a previously valid savestate.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::bufread::MultiGzDecoder;
use flate2::write::GzEncoder;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Open a savestate for reading, decompressing it if it is gzip
pub fn open_savestate<P: AsRef<Path>>(path: P) -> Result<Box<dyn Read>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = BufReader::new(file);
    if reader.fill_buf()?.starts_with(&GZIP_MAGIC) {
        debug!("Reading gzip savestate {}", path.display());
        Ok(Box::new(MultiGzDecoder::new(reader)))
    } else {
        debug!("Reading uncompressed savestate {}", path.display());
        Ok(Box::new(reader))
    }
}

/// A gzip savestate being written to a staging file
pub struct StagedOutput {
    encoder: GzEncoder<BufWriter<NamedTempFile>>,
    destination: PathBuf,
}

impl StagedOutput {
    pub fn create<P: AsRef<Path>>(destination: P) -> Result<Self> {
        let destination = destination.as_ref().to_path_buf();
        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let staging = NamedTempFile::new_in(dir).map_err(|source| Error::FileOpen {
            path: destination.clone(),
            source,
        })?;
        debug!("Staging output in {}", staging.path().display());

        Ok(Self {
            encoder: GzEncoder::new(BufWriter::new(staging), Compression::default()),
            destination,
        })
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Finish the gzip stream and move the staging file over the destination
    pub fn commit(self) -> Result<PathBuf> {
        let writer = self.encoder.finish()?;
        let staging = writer.into_inner().map_err(|e| e.into_error())?;
        staging.as_file().sync_all()?;
        staging
            .persist(&self.destination)
            .map_err(|e| Error::Io(e.error))?;
        Ok(self.destination)
    }
}

impl Write for StagedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.encoder.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.encoder.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn read_all(path: &Path) -> Vec<u8> {
        let mut data = Vec::new();
        open_savestate(path).unwrap().read_to_end(&mut data).unwrap();
        data
    }

    #[test]
    fn test_commit_writes_gzip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.st");
        let payload: Vec<u8> = (0..0x4000u32).flat_map(|v| v.to_le_bytes()).collect();

        let mut output = StagedOutput::create(&path).unwrap();
        output.write_all(&payload).unwrap();
        assert!(!path.exists());
        assert_eq!(output.commit().unwrap(), path);

        let raw = fs::read(&path).unwrap();
        assert_eq!(raw[..2], GZIP_MAGIC);
        assert_eq!(read_all(&path), payload);
    }

    #[test]
    fn test_uncompressed_input_is_read_raw() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.st");
        fs::write(&path, b"\x00\x01\x02\x03rdram").unwrap();
        assert_eq!(read_all(&path), b"\x00\x01\x02\x03rdram");
    }

    #[test]
    fn test_dropped_output_keeps_previous_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.st");
        fs::write(&path, b"previous").unwrap();

        {
            let mut output = StagedOutput::create(&path).unwrap();
            output.write_all(b"partial").unwrap();
        }

        assert_eq!(fs::read(&path).unwrap(), b"previous");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_input() {
        let dir = tempdir().unwrap();
        let err = open_savestate(dir.path().join("missing.st")).err().unwrap();
        assert!(err.is_not_found());
    }
}
