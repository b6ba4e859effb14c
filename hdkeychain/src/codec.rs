//! Public-key byte encodings: 33-byte compressed, 65-byte uncompressed,
//! and parsing with point decompression.

use num_bigint::BigUint;

use crate::curve::{CurveParams, CurvePoint, be_bytes_32};
use crate::error::Error;
use crate::keys::PublicKey;

pub const PUBKEY_BYTES_COMPRESSED: usize = 33;
pub const PUBKEY_BYTES_UNCOMPRESSED: usize = 65;

const FORMAT_EVEN: u8 = 0x02;
const FORMAT_ODD: u8 = 0x03;
const FORMAT_UNCOMPRESSED: u8 = 0x04;

/// 0x04 followed by X and Y, each left-zero-padded to 32 bytes.
pub fn serialize_uncompressed(point: &CurvePoint) -> [u8; PUBKEY_BYTES_UNCOMPRESSED] {
    let mut out = [0u8; PUBKEY_BYTES_UNCOMPRESSED];
    out[0] = FORMAT_UNCOMPRESSED;
    out[1..33].copy_from_slice(&be_bytes_32(&point.x));
    out[33..65].copy_from_slice(&be_bytes_32(&point.y));
    out
}

/// 0x02 (even Y) or 0x03 (odd Y) followed by X padded to 32 bytes.
pub fn serialize_compressed(point: &CurvePoint) -> [u8; PUBKEY_BYTES_COMPRESSED] {
    let mut out = [0u8; PUBKEY_BYTES_COMPRESSED];
    out[0] = if is_odd(&point.y) { FORMAT_ODD } else { FORMAT_EVEN };
    out[1..33].copy_from_slice(&be_bytes_32(&point.x));
    out
}

/// Parses either public-key encoding, decompressing the Y coordinate when
/// only its parity is present. Both coordinates must lie below the field
/// prime and the point must satisfy the curve equation.
pub fn parse_pub_key(bytes: &[u8], params: &CurveParams) -> Result<PublicKey, Error> {
    let point = match bytes.len() {
        PUBKEY_BYTES_COMPRESSED => {
            let format = bytes[0];
            if format != FORMAT_EVEN && format != FORMAT_ODD {
                return Err(Error::InvalidFormatFlag(format));
            }
            let x = BigUint::from_bytes_be(&bytes[1..33]);
            let y = decompress_point(params, &x, format == FORMAT_ODD)?;
            CurvePoint { x, y }
        }
        PUBKEY_BYTES_UNCOMPRESSED => {
            if bytes[0] != FORMAT_UNCOMPRESSED {
                return Err(Error::InvalidFormatFlag(bytes[0]));
            }
            CurvePoint {
                x: BigUint::from_bytes_be(&bytes[1..33]),
                y: BigUint::from_bytes_be(&bytes[33..65]),
            }
        }
        other => return Err(Error::InvalidLength(other)),
    };

    if point.x >= params.p || point.y >= params.p {
        return Err(Error::CoordinateOutOfRange);
    }
    if !params.is_on_curve(&point.x, &point.y) {
        return Err(Error::PointOffCurve);
    }
    Ok(PublicKey { point })
}

/// Recovers Y from X and a parity bit via y = (x³ + B)^((P+1)/4) mod P,
/// valid because P ≡ 3 (mod 4) for this curve family.
fn decompress_point(params: &CurveParams, x: &BigUint, odd: bool) -> Result<BigUint, Error> {
    let x3 = (x * x * x + &params.b) % &params.p;
    let mut y = x3.modpow(params.q_plus_1_div_4(), &params.p);
    if odd != is_odd(&y) {
        y = &params.p - &y;
    }
    // The exponentiation only yields a root when x³ + B is a quadratic
    // residue; verify rather than trust.
    if (&y * &y) % &params.p != x3 {
        return Err(Error::InvalidSquareRoot);
    }
    if odd != is_odd(&y) {
        return Err(Error::ParityMismatch);
    }
    Ok(y)
}

pub(crate) fn is_odd(value: &BigUint) -> bool {
    value % 2u8 == BigUint::from(1u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const GEN_COMPRESSED: [u8; 33] =
        hex!("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
    const GEN_UNCOMPRESSED: [u8; 65] = hex!(
        "0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"
    );

    #[test]
    fn compressed_roundtrip() {
        let params = CurveParams::secp256k1();
        let key = parse_pub_key(&GEN_COMPRESSED, &params).unwrap();
        assert_eq!(key.point, params.generator());
        assert_eq!(serialize_compressed(&key.point), GEN_COMPRESSED);
    }

    #[test]
    fn uncompressed_roundtrip() {
        let params = CurveParams::secp256k1();
        let key = parse_pub_key(&GEN_UNCOMPRESSED, &params).unwrap();
        assert_eq!(key.point, params.generator());
        assert_eq!(serialize_uncompressed(&key.point), GEN_UNCOMPRESSED);
    }

    #[test]
    fn odd_parity_decompression() {
        let params = CurveParams::secp256k1();
        // Same X as the generator with the odd-parity flag selects P - Gy.
        let mut bytes = GEN_COMPRESSED;
        bytes[0] = 0x03;
        let key = parse_pub_key(&bytes, &params).unwrap();
        assert_eq!(key.point.y, &params.p - &params.generator().y);
        assert_eq!(serialize_compressed(&key.point), bytes);
    }

    #[test]
    fn rejects_bad_length() {
        let params = CurveParams::secp256k1();
        assert_eq!(
            parse_pub_key(&[0u8; 32], &params).unwrap_err(),
            Error::InvalidLength(32)
        );
        assert_eq!(
            parse_pub_key(&[], &params).unwrap_err(),
            Error::InvalidLength(0)
        );
    }

    #[test]
    fn rejects_bad_format_flag() {
        let params = CurveParams::secp256k1();
        let mut compressed = GEN_COMPRESSED;
        compressed[0] = 0x05;
        assert_eq!(
            parse_pub_key(&compressed, &params).unwrap_err(),
            Error::InvalidFormatFlag(0x05)
        );
        let mut uncompressed = GEN_UNCOMPRESSED;
        uncompressed[0] = 0x02;
        assert_eq!(
            parse_pub_key(&uncompressed, &params).unwrap_err(),
            Error::InvalidFormatFlag(0x02)
        );
    }

    #[test]
    fn rejects_coordinate_at_prime() {
        let params = CurveParams::secp256k1();
        let mut bytes = [0u8; 65];
        bytes[0] = 0x04;
        bytes[1..33].copy_from_slice(&be_bytes_32(&params.p));
        bytes[33..65].copy_from_slice(&be_bytes_32(&params.generator().y));
        assert_eq!(
            parse_pub_key(&bytes, &params).unwrap_err(),
            Error::CoordinateOutOfRange
        );
    }

    #[test]
    fn rejects_point_off_curve() {
        let params = CurveParams::secp256k1();
        let g = params.generator();
        let mut bytes = [0u8; 65];
        bytes[0] = 0x04;
        bytes[1..33].copy_from_slice(&be_bytes_32(&g.x));
        bytes[33..65].copy_from_slice(&be_bytes_32(&g.x));
        assert_eq!(
            parse_pub_key(&bytes, &params).unwrap_err(),
            Error::PointOffCurve
        );
    }

    /// X = 7 has no matching Y on the curve; decompression must notice.
    #[test]
    fn rejects_non_residue() {
        let params = CurveParams::secp256k1();
        let mut bytes = [0u8; 33];
        bytes[0] = 0x02;
        bytes[32] = 0x07;
        assert_eq!(
            parse_pub_key(&bytes, &params).unwrap_err(),
            Error::InvalidSquareRoot
        );
    }
}
