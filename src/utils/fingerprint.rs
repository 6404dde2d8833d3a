//! Content fingerprinting
//!
//! The fingerprint is the SHA-256 of the file bytes in lowercase hex. It
//! depends on nothing but the content, so identical files at different
//! paths share an identity.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 64 * 1024;

pub struct FingerprintHasher;

impl FingerprintHasher {
    /// Stream the file through the digest in fixed-size chunks
    pub fn hash_file(path: &Path) -> io::Result<String> {
        let mut file = File::open(path)?;
        Self::hash_reader(&mut file)
    }

    pub fn hash_reader<R: Read>(reader: &mut R) -> io::Result<String> {
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; CHUNK_SIZE];
        loop {
            let read = reader.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }
        Ok(hex::encode(hasher.finalize()))
    }
}
