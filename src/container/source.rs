//! Container input bytes, memory-mapped or buffered.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use memmap2::Mmap;

use crate::util::Result;

/// Raw bytes of one container file.
///
/// The file handle and mapping live exactly as long as this value.
pub struct ContainerSource {
    inner: SourceInner,
}

enum SourceInner {
    /// Memory-mapped file (preferred for large files)
    Mmap(Mmap),
    /// Owned bytes (buffered read, or caller-provided)
    Buffer(Vec<u8>),
}

impl ContainerSource {
    /// Open a file for reading with memory mapping.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_opts(path, true)
    }

    /// Open a file with optional memory mapping.
    pub fn open_opts(path: impl AsRef<Path>, use_mmap: bool) -> Result<Self> {
        let mut file = File::open(path.as_ref())?;
        let size = file.metadata()?.len();

        let inner = if use_mmap && size > 0 {
            // Safety: the file is opened read-only and the mapping is dropped
            // before the source is; concurrent truncation by another process
            // is outside what this reader defends against.
            let mmap = unsafe { Mmap::map(&file) }?;
            SourceInner::Mmap(mmap)
        } else {
            let mut buf = Vec::with_capacity(size as usize);
            file.read_to_end(&mut buf)?;
            SourceInner::Buffer(buf)
        };

        Ok(Self { inner })
    }

    /// Wrap bytes already in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            inner: SourceInner::Buffer(bytes),
        }
    }

    /// All container bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        match &self.inner {
            SourceInner::Mmap(mmap) => &mmap[..],
            SourceInner::Buffer(buf) => buf.as_slice(),
        }
    }

    /// Total size in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.bytes().len() as u64
    }

    /// Check if the bytes are memory-mapped.
    #[inline]
    pub fn is_mapped(&self) -> bool {
        matches!(self.inner, SourceInner::Mmap(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_modes() {
        let mut temp = tempfile::NamedTempFile::new().unwrap();
        temp.write_all(b"PK\x05\x06 not really").unwrap();
        temp.flush().unwrap();

        let mapped = ContainerSource::open_opts(temp.path(), true).unwrap();
        let buffered = ContainerSource::open_opts(temp.path(), false).unwrap();
        assert!(mapped.is_mapped());
        assert!(!buffered.is_mapped());
        assert_eq!(mapped.bytes(), buffered.bytes());
        assert_eq!(mapped.size(), 15);
    }

    #[test]
    fn test_empty_file_is_buffered() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let source = ContainerSource::open(temp.path()).unwrap();
        assert!(!source.is_mapped());
        assert_eq!(source.size(), 0);
    }

    #[test]
    fn test_missing_file() {
        let err = ContainerSource::open("/nonexistent/scene.zf3d").err().unwrap();
        assert!(matches!(err, crate::util::ContainerError::Io(_)));
    }
}
