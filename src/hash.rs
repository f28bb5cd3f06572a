//! ContentHasher (C2): identity for dedup across hardlinks and symlinks.
//!
//! MD5 is not used for anything security-sensitive here — it just needs to
//! be stable enough to tell two files apart, matching the original
//! `makemandb`'s choice of hash for this purpose.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use md5::{Digest, Md5};

use crate::error::{Error, Result};

const READ_BUF_SIZE: usize = 64 * 1024;

/// Hash the contents of `path`, returning a lowercase hex digest.
pub fn hash_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|source| Error::Hash {
        path: path.to_path_buf(),
        source,
    })?;

    let mut hasher = Md5::new();
    let mut buf = [0u8; READ_BUF_SIZE];
    loop {
        let n = read_chunk(&mut file, &mut buf).map_err(|source| Error::Hash {
            path: path.to_path_buf(),
            source,
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex_encode(&hasher.finalize()))
}

fn read_chunk(file: &mut File, buf: &mut [u8]) -> io::Result<usize> {
    file.read(buf)
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
