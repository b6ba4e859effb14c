//! Hierarchical-deterministic extended keys: master construction, child
//! derivation, neutering, and the 78-byte Base58Check serialization.

use std::fmt;
use std::sync::OnceLock;

use num_bigint::BigUint;
use num_traits::Zero;
use zeroize::Zeroize;

use crate::codec;
use crate::curve::{CurveParams, be_bytes_32};
use crate::error::Error;
use crate::keys::{PrivateKey, PublicKey};
use crypto_utils::base58::{base58_check_decode, base58_check_encode};
use crypto_utils::hash::hash160;
use crypto_utils::hmac::hmac_sha512;

/// Index offset for hardened children: indices >= 2³¹ need the parent
/// private key and can never be derived from a neutered node.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

pub const MIN_SEED_BYTES: usize = 16;
pub const MAX_SEED_BYTES: usize = 64;

/// HMAC-SHA512 domain-separation key for master key stretching.
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

// Serialization version IDs (xprv/xpub and their testnet counterparts).
const VERSION_MAINNET_PRIVATE: [u8; 4] = [0x04, 0x88, 0xAD, 0xE4];
const VERSION_MAINNET_PUBLIC: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E];
const VERSION_TESTNET_PRIVATE: [u8; 4] = [0x04, 0x35, 0x83, 0x94];
const VERSION_TESTNET_PUBLIC: [u8; 4] = [0x04, 0x35, 0x87, 0xCF];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    pub fn hd_private_key_id(self) -> [u8; 4] {
        match self {
            Network::Mainnet => VERSION_MAINNET_PRIVATE,
            Network::Testnet => VERSION_TESTNET_PRIVATE,
        }
    }

    pub fn hd_public_key_id(self) -> [u8; 4] {
        match self {
            Network::Mainnet => VERSION_MAINNET_PUBLIC,
            Network::Testnet => VERSION_TESTNET_PUBLIC,
        }
    }
}

/// The public-key version matching a node's version, used by `neuter`.
fn public_version(version: [u8; 4]) -> [u8; 4] {
    match version {
        VERSION_TESTNET_PRIVATE | VERSION_TESTNET_PUBLIC => VERSION_TESTNET_PUBLIC,
        _ => VERSION_MAINNET_PUBLIC,
    }
}

/// An HD node: key material plus the chain code and tree position needed
/// to derive children.
///
/// Immutable after construction except for the lazily cached compressed
/// public key of a private node, which is computed at most once.
pub struct ExtendedKey {
    version: [u8; 4],
    key: Vec<u8>,
    pub_key: OnceLock<[u8; 33]>,
    chain_code: [u8; 32],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: u32,
    is_private: bool,
}

impl ExtendedKey {
    fn new(
        version: [u8; 4],
        key: Vec<u8>,
        chain_code: [u8; 32],
        parent_fingerprint: [u8; 4],
        depth: u8,
        child_number: u32,
        is_private: bool,
    ) -> Self {
        ExtendedKey {
            version,
            key,
            pub_key: OnceLock::new(),
            chain_code,
            depth,
            parent_fingerprint,
            child_number,
            is_private,
        }
    }

    /// Master node from seed entropy. The seed is stretched with
    /// HMAC-SHA512; the left half becomes the root scalar and the right
    /// half the root chain code. A zero scalar is rejected, and the
    /// caller must pick another seed.
    pub fn new_master(seed: &[u8], network: Network) -> Result<Self, Error> {
        if seed.len() < MIN_SEED_BYTES || seed.len() > MAX_SEED_BYTES {
            return Err(Error::InvalidSeedLength(seed.len()));
        }

        let mut digest = hmac_sha512(MASTER_HMAC_KEY, seed);
        let secret_key = digest[..32].to_vec();
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&digest[32..]);
        digest.zeroize();

        if BigUint::from_bytes_be(&secret_key).is_zero() {
            return Err(Error::InvalidSeed);
        }

        Ok(ExtendedKey::new(
            network.hd_private_key_id(),
            secret_key,
            chain_code,
            [0u8; 4],
            0,
            0,
            true,
        ))
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    pub fn child_number(&self) -> u32 {
        self.child_number
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    pub fn version(&self) -> [u8; 4] {
        self.version
    }

    pub fn is_private(&self) -> bool {
        self.is_private
    }

    /// Derives the child node at `index`, never mutating `self`.
    ///
    /// Private parents yield private children (scalar = (IL + parent)
    /// mod N); public parents yield public children (point = IL·G +
    /// parent). An out-of-range or degenerate intermediate surfaces as
    /// `InvalidChild`; the standard remedy of moving on to `index + 1`
    /// is left to the caller.
    pub fn child(&self, index: u32, params: &CurveParams) -> Result<Self, Error> {
        if self.depth == u8::MAX {
            return Err(Error::MaxDepthExceeded);
        }

        let hardened = index >= HARDENED_OFFSET;
        if hardened && !self.is_private {
            return Err(Error::HardenedFromPublicKey);
        }

        // Hardened: 0x00 || ser256(parent key) || ser32(index)
        // Normal:   serP(parent pubkey) || ser32(index)
        let mut data = Vec::with_capacity(37);
        if hardened {
            data.push(0);
            data.extend_from_slice(&self.key);
        } else {
            data.extend_from_slice(&self.public_key_bytes(params));
        }
        data.extend_from_slice(&index.to_be_bytes());

        let mut digest = hmac_sha512(&self.chain_code, &data);
        data.zeroize();

        let il = BigUint::from_bytes_be(&digest[..32]);
        let mut child_chain_code = [0u8; 32];
        child_chain_code.copy_from_slice(&digest[32..]);
        digest.zeroize();

        if il >= params.n || il.is_zero() {
            return Err(Error::InvalidChild);
        }

        let (child_key, is_private) = if self.is_private {
            let parent = BigUint::from_bytes_be(&self.key);
            let child = (il + parent) % &params.n;
            (be_bytes_32(&child).to_vec(), true)
        } else {
            let tweak = params.scalar_base_mult(&be_bytes_32(&il));
            if tweak.has_zero_coordinate() {
                return Err(Error::InvalidChild);
            }
            let parent = codec::parse_pub_key(&self.key, params)?;
            let sum = params.add(&tweak, &parent.point);
            (codec::serialize_compressed(&sum).to_vec(), false)
        };

        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&hash160(&self.public_key_bytes(params))[..4]);

        Ok(ExtendedKey::new(
            self.version,
            child_key,
            child_chain_code,
            parent_fingerprint,
            self.depth + 1,
            index,
            is_private,
        ))
    }

    /// The compressed public key for this node. Private nodes compute it
    /// once and cache the result; concurrent callers may race on the
    /// first computation but always observe the same bytes.
    pub fn public_key_bytes(&self, params: &CurveParams) -> [u8; 33] {
        if !self.is_private {
            let mut out = [0u8; 33];
            out.copy_from_slice(&self.key);
            return out;
        }
        *self
            .pub_key
            .get_or_init(|| codec::serialize_compressed(&params.scalar_base_mult(&self.key)))
    }

    /// The public-only counterpart: same position in the tree, no private
    /// key. Idempotent.
    pub fn neuter(&self, params: &CurveParams) -> ExtendedKey {
        if !self.is_private {
            return self.clone();
        }
        ExtendedKey::new(
            public_version(self.version),
            self.public_key_bytes(params).to_vec(),
            self.chain_code,
            self.parent_fingerprint,
            self.depth,
            self.child_number,
            false,
        )
    }

    pub fn ec_priv_key(&self, params: &CurveParams) -> Result<PrivateKey, Error> {
        if !self.is_private {
            return Err(Error::NotPrivateExtendedKey);
        }
        Ok(PrivateKey::from_bytes(&self.key, params))
    }

    pub fn ec_pub_key(&self, params: &CurveParams) -> Result<PublicKey, Error> {
        codec::parse_pub_key(&self.public_key_bytes(params), params)
    }

    /// The canonical 78-byte serialization, Base58Check-encoded:
    /// version(4) || depth(1) || parent fingerprint(4) || child number(4)
    /// || chain code(32) || key data(33, zero-prefixed private scalar).
    pub fn to_base58(&self) -> String {
        let mut payload = Vec::with_capacity(78);
        payload.extend_from_slice(&self.version);
        payload.push(self.depth);
        payload.extend_from_slice(&self.parent_fingerprint);
        payload.extend_from_slice(&self.child_number.to_be_bytes());
        payload.extend_from_slice(&self.chain_code);
        if self.is_private {
            payload.push(0);
        }
        payload.extend_from_slice(&self.key);
        let text = base58_check_encode(&payload);
        payload.zeroize();
        text
    }

    /// Parses and validates the 78-byte serialization.
    pub fn from_base58(text: &str, params: &CurveParams) -> Result<Self, Error> {
        let data = base58_check_decode(text).map_err(Error::from)?;
        if data.len() != 78 {
            return Err(Error::InvalidLength(data.len()));
        }

        let mut version = [0u8; 4];
        version.copy_from_slice(&data[0..4]);
        let is_private = match version {
            VERSION_MAINNET_PRIVATE | VERSION_TESTNET_PRIVATE => true,
            VERSION_MAINNET_PUBLIC | VERSION_TESTNET_PUBLIC => false,
            _ => return Err(Error::InvalidVersion),
        };

        let depth = data[4];
        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&data[5..9]);
        let child_number = u32::from_be_bytes([data[9], data[10], data[11], data[12]]);
        // A root node cannot claim a parent or an index.
        if depth == 0 && (parent_fingerprint != [0u8; 4] || child_number != 0) {
            return Err(Error::InvalidChild);
        }

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&data[13..45]);

        let key_data = &data[45..78];
        let key = if is_private {
            if key_data[0] != 0 {
                return Err(Error::InvalidKeyData);
            }
            let scalar = BigUint::from_bytes_be(&key_data[1..]);
            if scalar.is_zero() || scalar >= params.n {
                return Err(Error::InvalidKeyData);
            }
            key_data[1..].to_vec()
        } else {
            codec::parse_pub_key(key_data, params).map_err(|_| Error::InvalidKeyData)?;
            key_data.to_vec()
        };

        Ok(ExtendedKey::new(
            version,
            key,
            chain_code,
            parent_fingerprint,
            depth,
            child_number,
            is_private,
        ))
    }
}

impl Clone for ExtendedKey {
    fn clone(&self) -> Self {
        ExtendedKey {
            version: self.version,
            key: self.key.clone(),
            pub_key: self.pub_key.clone(),
            chain_code: self.chain_code,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_number: self.child_number,
            is_private: self.is_private,
        }
    }
}

// The cache is derived state and excluded from comparisons.
impl PartialEq for ExtendedKey {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.key == other.key
            && self.chain_code == other.chain_code
            && self.depth == other.depth
            && self.parent_fingerprint == other.parent_fingerprint
            && self.child_number == other.child_number
            && self.is_private == other.is_private
    }
}

impl Eq for ExtendedKey {}

// Key material stays out of debug output.
impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("depth", &self.depth)
            .field("child_number", &self.child_number)
            .field("parent_fingerprint", &self.parent_fingerprint)
            .field("is_private", &self.is_private)
            .finish_non_exhaustive()
    }
}

impl Drop for ExtendedKey {
    fn drop(&mut self) {
        self.key.zeroize();
        self.chain_code.zeroize();
    }
}
