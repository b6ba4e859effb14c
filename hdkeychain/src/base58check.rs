//! Version-tagged Base58Check: one version byte, the payload, and a
//! 4-byte double-SHA256 checksum. Leading zero bytes of the checksummed
//! buffer survive as literal '1' characters via the raw codec.

use crypto_utils::base58::{base58_decode, base58_encode};
use crypto_utils::hash::sha256d;

use crate::error::Error;

const CHECKSUM_LEN: usize = 4;

pub fn encode(version: u8, payload: &[u8]) -> String {
    let mut buf = Vec::with_capacity(1 + payload.len() + CHECKSUM_LEN);
    buf.push(version);
    buf.extend_from_slice(payload);
    let checksum = sha256d(&buf);
    buf.extend_from_slice(&checksum[..CHECKSUM_LEN]);
    base58_encode(&buf)
}

/// Decodes into `(version, payload)`. The decoded buffer must hold at
/// least the version byte and the checksum.
pub fn decode(text: &str) -> Result<(u8, Vec<u8>), Error> {
    let full = base58_decode(text)?;
    if full.len() < 1 + CHECKSUM_LEN {
        return Err(Error::MissingChecksum);
    }
    let (buf, checksum) = full.split_at(full.len() - CHECKSUM_LEN);
    if sha256d(buf)[..CHECKSUM_LEN] != *checksum {
        return Err(Error::ChecksumMismatch);
    }
    Ok((buf[0], buf[1..].to_vec()))
}
