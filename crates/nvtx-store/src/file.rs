//! File-backed implementation of the Medium trait.
//!
//! The file is a raw EEPROM image: byte `n` of the file is address `n` of
//! the medium. Reads are served from an in-memory mirror; every changed byte
//! is written through to the file immediately so an abrupt process exit
//! leaves the image in the same state a device would be in.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};
use crate::traits::Medium;
use crate::ERASED_BYTE;

/// EEPROM image stored in a file.
#[derive(Debug)]
pub struct FileMedium {
    path: PathBuf,
    file: File,
    mirror: Vec<u8>,
}

impl FileMedium {
    /// Open an existing image, or create an erased one of `capacity` bytes.
    ///
    /// An existing image must be exactly `capacity` bytes long.
    pub fn open(path: impl AsRef<Path>, capacity: usize) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Self::create(path, capacity);
        }

        let mut file = OpenOptions::new().read(true).write(true).open(path)?;
        let found = file.metadata()?.len();
        if found != capacity as u64 {
            return Err(StoreError::ImageSize {
                expected: capacity as u64,
                found,
            });
        }

        let mut mirror = Vec::with_capacity(capacity);
        file.read_to_end(&mut mirror)?;
        tracing::debug!(path = %path.display(), capacity, "opened image");

        Ok(Self {
            path: path.to_path_buf(),
            file,
            mirror,
        })
    }

    /// Create (or truncate) an erased image of `capacity` bytes.
    pub fn create(path: impl AsRef<Path>, capacity: usize) -> Result<Self> {
        let path = path.as_ref();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        let mirror = vec![ERASED_BYTE; capacity];
        file.write_all(&mirror)?;
        file.sync_data()?;
        tracing::debug!(path = %path.display(), capacity, "created erased image");

        Ok(Self {
            path: path.to_path_buf(),
            file,
            mirror,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw view of the image.
    pub fn as_bytes(&self) -> &[u8] {
        &self.mirror
    }

    fn check(&self, addr: usize) -> Result<()> {
        if addr < self.mirror.len() {
            Ok(())
        } else {
            Err(StoreError::OutOfBounds {
                addr,
                capacity: self.mirror.len(),
            })
        }
    }
}

impl Medium for FileMedium {
    fn capacity(&self) -> usize {
        self.mirror.len()
    }

    fn read_byte(&mut self, addr: usize) -> Result<u8> {
        self.check(addr)?;
        Ok(self.mirror[addr])
    }

    fn write_if_changed(&mut self, addr: usize, byte: u8) -> Result<()> {
        self.check(addr)?;
        if self.mirror[addr] == byte {
            return Ok(());
        }

        self.file.seek(SeekFrom::Start(addr as u64))?;
        self.file.write_all(&[byte])?;
        self.mirror[addr] = byte;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.file.sync_data()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_is_erased() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("eeprom.bin");

        let medium = FileMedium::create(&path, 32).unwrap();
        assert_eq!(medium.capacity(), 32);
        assert!(medium.as_bytes().iter().all(|&b| b == ERASED_BYTE));
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 32);
    }

    #[test]
    fn test_writes_persist_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("eeprom.bin");

        {
            let mut medium = FileMedium::open(&path, 16).unwrap();
            medium.put_u16(4, 0xBB3C).unwrap();
            medium.write_if_changed(15, 0x42).unwrap();
            medium.flush().unwrap();
        }

        let mut reopened = FileMedium::open(&path, 16).unwrap();
        assert_eq!(reopened.get_u16(4).unwrap(), 0xBB3C);
        assert_eq!(reopened.read_byte(15).unwrap(), 0x42);
        assert_eq!(reopened.read_byte(0).unwrap(), ERASED_BYTE);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("eeprom.bin");
        FileMedium::create(&path, 16).unwrap();

        let err = FileMedium::open(&path, 32).unwrap_err();
        assert!(matches!(err, StoreError::ImageSize { expected: 32, found: 16 }));
    }

    #[test]
    fn test_out_of_bounds() {
        let dir = tempdir().unwrap();
        let mut medium = FileMedium::create(dir.path().join("e.bin"), 8).unwrap();
        assert!(matches!(
            medium.write_if_changed(8, 0),
            Err(StoreError::OutOfBounds { addr: 8, capacity: 8 })
        ));
    }
}
