//! Private and public key types with their WIF and address text formats.

use zeroize::Zeroize;

use crate::base58check;
use crate::codec;
use crate::curve::{CurveParams, CurvePoint};
use crate::error::Error;
use crypto_utils::hash::hash160;

/// Version byte for Wallet Import Format strings.
pub const WIF_VERSION: u8 = 0x80;
/// Suffix byte marking a WIF key as intended for compressed public keys.
pub const WIF_COMPRESSED_FLAG: u8 = 0x01;
/// Version byte for pay-to-pubkey-hash addresses.
pub const ADDRESS_VERSION: u8 = 0x00;

/// A point on the curve. Constructible from serialized bytes alone, with
/// no matching private scalar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    pub point: CurvePoint,
}

impl PublicKey {
    pub fn from_slice(bytes: &[u8], params: &CurveParams) -> Result<Self, Error> {
        codec::parse_pub_key(bytes, params)
    }

    pub fn serialize_compressed(&self) -> [u8; 33] {
        codec::serialize_compressed(&self.point)
    }

    pub fn serialize_uncompressed(&self) -> [u8; 65] {
        codec::serialize_uncompressed(&self.point)
    }

    /// Checksummed address over the uncompressed serialization.
    pub fn to_address(&self) -> String {
        base58check::encode(ADDRESS_VERSION, &hash160(&self.serialize_uncompressed()))
    }

    /// Checksummed address over the compressed serialization.
    pub fn to_address_compressed(&self) -> String {
        base58check::encode(ADDRESS_VERSION, &hash160(&self.serialize_compressed()))
    }
}

/// Private scalar with its derived public key. Immutable after
/// construction; the scalar bytes are wiped on drop.
///
/// Deliberately no `Debug`, `Clone`, or `Display`: the scalar leaves this
/// struct only through `to_bytes` and the WIF encoders.
pub struct PrivateKey {
    d: [u8; 32],
    public: PublicKey,
}

impl PrivateKey {
    /// Builds the key pair for a scalar given as up to 32 big-endian
    /// bytes; shorter input is left-zero-padded.
    pub fn from_bytes(bytes: &[u8], params: &CurveParams) -> Self {
        let point = params.scalar_base_mult(bytes);
        let mut d = [0u8; 32];
        d[32 - bytes.len()..].copy_from_slice(bytes);
        PrivateKey {
            d,
            public: PublicKey { point },
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// The scalar as exactly 32 big-endian bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.d
    }

    pub fn to_wif(&self) -> String {
        base58check::encode(WIF_VERSION, &self.d)
    }

    /// WIF with the trailing compression suffix, telling consumers to
    /// derive the address from the compressed public key.
    pub fn to_wif_compressed(&self) -> String {
        let mut payload = [0u8; 33];
        payload[..32].copy_from_slice(&self.d);
        payload[32] = WIF_COMPRESSED_FLAG;
        let wif = base58check::encode(WIF_VERSION, &payload);
        payload.zeroize();
        wif
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.d.zeroize();
    }
}

// Redacting `Debug` so `Result<PrivateKey, _>::unwrap_err` has its bound
// satisfied without the scalar ever reaching formatted output, preserving
// the invariant that it leaves only through `to_bytes` and the WIF encoders.
impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("d", &"<redacted>")
            .field("public", &self.public)
            .finish()
    }
}

/// Decodes a WIF or compressed-WIF string into the raw 32-byte private
/// scalar; the compression suffix is validated and stripped.
pub fn load_wif(wif: &str) -> Result<[u8; 32], Error> {
    let (version, payload) = base58check::decode(wif)?;
    if version != WIF_VERSION {
        return Err(Error::InvalidVersionByte(version));
    }
    match payload.len() {
        32 => {}
        33 => {
            if payload[32] != WIF_COMPRESSED_FLAG {
                return Err(Error::InvalidCompressionSuffix(payload[32]));
            }
        }
        other => return Err(Error::InvalidPayloadLength(other)),
    }
    let mut key = [0u8; 32];
    key.copy_from_slice(&payload[..32]);
    Ok(key)
}

/// Decodes an address; `Ok` carries the HASH160 payload.
pub fn load_address(address: &str) -> Result<Vec<u8>, Error> {
    let (version, payload) = base58check::decode(address)?;
    if version != ADDRESS_VERSION {
        return Err(Error::InvalidVersionByte(version));
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn key_one(params: &CurveParams) -> PrivateKey {
        PrivateKey::from_bytes(&[1], params)
    }

    #[test]
    fn wif_for_scalar_one() {
        let params = CurveParams::secp256k1();
        let key = key_one(&params);
        assert_eq!(
            key.to_wif(),
            "5HpHagT65TZzG1PH3CSu63k8DbpvD8s5ip4nEB3kEsreAnchuDf"
        );
        assert_eq!(
            key.to_wif_compressed(),
            "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn"
        );
    }

    #[test]
    fn wif_known_vector() {
        let params = CurveParams::secp256k1();
        let scalar = hex!("0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d");
        let key = PrivateKey::from_bytes(&scalar, &params);
        assert_eq!(
            key.to_wif(),
            "5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ"
        );
        assert_eq!(
            key.to_wif_compressed(),
            "KwdMAjGmerYanjeui5SHS7JkmpZvVipYvB2LJGU1ZxJwYvP98617"
        );
    }

    #[test]
    fn wif_roundtrip_strips_suffix() {
        let params = CurveParams::secp256k1();
        let scalar = hex!("0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d");
        let key = PrivateKey::from_bytes(&scalar, &params);
        assert_eq!(load_wif(&key.to_wif()).unwrap(), scalar);
        assert_eq!(load_wif(&key.to_wif_compressed()).unwrap(), scalar);
    }

    #[test]
    fn load_wif_rejects_wrong_version() {
        let encoded = base58check::encode(0xef, &[0u8; 32]);
        assert_eq!(
            load_wif(&encoded).unwrap_err(),
            Error::InvalidVersionByte(0xef)
        );
    }

    #[test]
    fn load_wif_rejects_bad_payload_length() {
        let encoded = base58check::encode(WIF_VERSION, &[0u8; 31]);
        assert_eq!(
            load_wif(&encoded).unwrap_err(),
            Error::InvalidPayloadLength(31)
        );
    }

    #[test]
    fn load_wif_rejects_bad_suffix() {
        let mut payload = [0u8; 33];
        payload[32] = 0x02;
        let encoded = base58check::encode(WIF_VERSION, &payload);
        assert_eq!(
            load_wif(&encoded).unwrap_err(),
            Error::InvalidCompressionSuffix(0x02)
        );
    }

    #[test]
    fn addresses_for_scalar_one() {
        let params = CurveParams::secp256k1();
        let key = key_one(&params);
        assert_eq!(
            key.public_key().to_address(),
            "1EHNa6Q4Jz2uvNExL497mE43ikXhwF6kZm"
        );
        assert_eq!(
            key.public_key().to_address_compressed(),
            "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"
        );
    }

    #[test]
    fn load_address_returns_hash160() {
        let params = CurveParams::secp256k1();
        let key = key_one(&params);
        let public = key.public_key();
        assert_eq!(
            load_address(&public.to_address()).unwrap(),
            hash160(&public.serialize_uncompressed())
        );
        assert_eq!(
            load_address(&public.to_address_compressed()).unwrap(),
            hash160(&public.serialize_compressed())
        );
    }

    #[test]
    fn load_address_rejects_wif_version() {
        let params = CurveParams::secp256k1();
        let wif = key_one(&params).to_wif();
        assert_eq!(
            load_address(&wif).unwrap_err(),
            Error::InvalidVersionByte(WIF_VERSION)
        );
    }

    #[test]
    fn private_key_pads_short_scalars() {
        let params = CurveParams::secp256k1();
        let key = PrivateKey::from_bytes(&[0x7f], &params);
        let mut expected = [0u8; 32];
        expected[31] = 0x7f;
        assert_eq!(key.to_bytes(), expected);
    }
}
