//! secp256k1 parameters and group operations.
//!
//! Field-level bookkeeping (the prime, the order, the on-curve predicate,
//! the square-root exponent) lives here as big integers; the group
//! operations delegate to the `secp256k1` library through affine
//! conversions.

use num_bigint::BigUint;
use num_traits::Zero;
use secp256k1::{All, PublicKey as LibPublicKey, Secp256k1, SecretKey};

/// Affine curve point. The pair `(0, 0)` stands in for the group
/// identity; there is no tagged point-at-infinity representation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurvePoint {
    pub x: BigUint,
    pub y: BigUint,
}

impl CurvePoint {
    pub fn identity() -> Self {
        CurvePoint {
            x: BigUint::zero(),
            y: BigUint::zero(),
        }
    }

    /// True when either coordinate is zero. Child derivation rejects such
    /// points as degenerate.
    pub fn has_zero_coordinate(&self) -> bool {
        self.x.is_zero() || self.y.is_zero()
    }
}

/// Short-Weierstrass curve parameters (y² = x³ + B over F_P) together
/// with a library context for the group operations. Construct once and
/// pass by reference.
pub struct CurveParams {
    pub p: BigUint,
    pub n: BigUint,
    pub b: BigUint,
    gx: BigUint,
    gy: BigUint,
    q_plus_1_div_4: BigUint,
    secp: Secp256k1<All>,
}

impl CurveParams {
    pub fn secp256k1() -> Self {
        let p = biguint_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F");
        let n = biguint_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");
        let gx = biguint_hex("79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798");
        let gy = biguint_hex("483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8");
        let q_plus_1_div_4 = (&p + 1u8) >> 2;
        CurveParams {
            p,
            n,
            b: BigUint::from(7u8),
            gx,
            gy,
            q_plus_1_div_4,
            secp: Secp256k1::new(),
        }
    }

    pub fn generator(&self) -> CurvePoint {
        CurvePoint {
            x: self.gx.clone(),
            y: self.gy.clone(),
        }
    }

    /// (P + 1) / 4. Raising to this exponent computes modular square
    /// roots because P ≡ 3 (mod 4).
    pub fn q_plus_1_div_4(&self) -> &BigUint {
        &self.q_plus_1_div_4
    }

    pub fn is_on_curve(&self, x: &BigUint, y: &BigUint) -> bool {
        let lhs = (y * y) % &self.p;
        let rhs = (x * x * x + &self.b) % &self.p;
        lhs == rhs
    }

    /// k·G for a big-endian scalar. The scalar is reduced mod N first; a
    /// zero residue yields the identity sentinel.
    pub fn scalar_base_mult(&self, k: &[u8]) -> CurvePoint {
        let scalar = BigUint::from_bytes_be(k) % &self.n;
        if scalar.is_zero() {
            return CurvePoint::identity();
        }
        match SecretKey::from_slice(&be_bytes_32(&scalar)) {
            Ok(sk) => lib_point_to_affine(&LibPublicKey::from_secret_key(&self.secp, &sk)),
            Err(_) => CurvePoint::identity(),
        }
    }

    /// p1 + p2. The identity sentinel absorbs: adding it returns the
    /// other operand, and a sum that lands on infinity collapses back to
    /// the sentinel.
    pub fn add(&self, p1: &CurvePoint, p2: &CurvePoint) -> CurvePoint {
        if p1.has_zero_coordinate() {
            return p2.clone();
        }
        if p2.has_zero_coordinate() {
            return p1.clone();
        }
        let (Some(a), Some(b)) = (affine_to_lib_point(p1), affine_to_lib_point(p2)) else {
            return CurvePoint::identity();
        };
        match a.combine(&b) {
            Ok(sum) => lib_point_to_affine(&sum),
            Err(_) => CurvePoint::identity(),
        }
    }
}

/// Big-endian bytes left-padded to 32. The value must fit, which holds
/// for anything below the field prime or the curve order.
pub(crate) fn be_bytes_32(value: &BigUint) -> [u8; 32] {
    let bytes = value.to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}

fn biguint_hex(digits: &str) -> BigUint {
    BigUint::parse_bytes(digits.as_bytes(), 16).expect("hard-coded curve constant")
}

fn affine_to_lib_point(point: &CurvePoint) -> Option<LibPublicKey> {
    let mut buf = [0u8; 65];
    buf[0] = 0x04;
    buf[1..33].copy_from_slice(&be_bytes_32(&point.x));
    buf[33..65].copy_from_slice(&be_bytes_32(&point.y));
    LibPublicKey::from_slice(&buf).ok()
}

fn lib_point_to_affine(key: &LibPublicKey) -> CurvePoint {
    let bytes = key.serialize_uncompressed();
    CurvePoint {
        x: BigUint::from_bytes_be(&bytes[1..33]),
        y: BigUint::from_bytes_be(&bytes[33..65]),
    }
}
