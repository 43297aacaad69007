//! File-backed spline-data blobs.
//!
//! Caches dumped to disk (by the CLI, or by host-side tooling) are
//! memory-mapped read-only and handed to the decoder as one contiguous
//! slice.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use super::SplineDataSource;
use crate::util::{Error, Result};

/// A spline-data blob memory-mapped from a file.
pub struct FileSplineData {
    mmap: Mmap,
}

impl FileSplineData {
    /// Map a blob file read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;

        if file.metadata()?.len() == 0 {
            return Err(Error::malformed(format!(
                "spline-data file is empty: {}",
                path.display()
            )));
        }

        // Safety: mapped read-only and never resized while held.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| Error::MmapFailed(e.to_string()))?;
        Ok(Self { mmap })
    }

    /// The mapped bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.mmap
    }

    /// Blob size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// Check if the blob is empty (never true for an opened file).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }
}

impl SplineDataSource for FileSplineData {
    fn fetch(&self) -> Result<Vec<u8>> {
        Ok(self.mmap.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_and_fetch() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"blob bytes").unwrap();
        tmp.flush().unwrap();

        let data = FileSplineData::open(tmp.path()).unwrap();
        assert_eq!(data.bytes(), b"blob bytes");
        assert_eq!(data.len(), 10);
        assert_eq!(data.fetch().unwrap(), b"blob bytes");
    }

    #[test]
    fn test_missing_file() {
        let r = FileSplineData::open("/no/such/spline.cache");
        assert!(matches!(r, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_empty_file_rejected() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let r = FileSplineData::open(tmp.path());
        assert!(matches!(r, Err(Error::MalformedContainer(_))));
    }
}
