use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

pub fn sha256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hasher.finalize().into()
}

/// Double SHA-256, used for Base58Check checksums.
pub fn sha256d(input: &[u8]) -> [u8; 32] {
    sha256(&sha256(input))
}

pub fn ripemd160(input: &[u8]) -> [u8; 20] {
    let mut hasher = Ripemd160::new();
    hasher.update(input);
    hasher.finalize().into()
}

/// RIPEMD160(SHA256(input)), the digest behind key fingerprints and
/// pay-to-pubkey-hash addresses.
pub fn hash160(input: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn sha256_empty() {
        let expected = hex!(
            "e3b0c44298fc1c149afbf4c8996fb924"
            "27ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(sha256(b""), expected);
    }

    #[test]
    fn sha256_abc() {
        let expected = hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
        assert_eq!(sha256(b"abc"), expected);
    }

    #[test]
    fn sha256d_empty() {
        let expected = hex!("5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456");
        assert_eq!(sha256d(b""), expected);
    }

    #[test]
    fn sha256d_hello() {
        let expected = hex!("9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50");
        assert_eq!(sha256d(b"hello"), expected);
    }

    #[test]
    fn ripemd160_empty() {
        let expected = hex!("9c1185a5c5e9fc54612808977ee8f548b2258d31");
        assert_eq!(ripemd160(b""), expected);
    }

    #[test]
    fn ripemd160_abc() {
        let expected = hex!("8eb208f7e05d987a9b044a8e98c6b087f15a0bfc");
        assert_eq!(ripemd160(b"abc"), expected);
    }

    #[test]
    fn ripemd160_quick_brown() {
        let expected = hex!("37f332f68db77bd9d7edd4969571ad671cf9dd3b");
        assert_eq!(
            ripemd160(b"The quick brown fox jumps over the lazy dog"),
            expected
        );
    }

    #[test]
    fn hash160_empty() {
        let expected = hex!("b472a266d0bd89c13706a4132ccfb16f7c3b9fcb");
        assert_eq!(hash160(b""), expected);
    }

    /// HASH160 of the compressed generator-point public key.
    #[test]
    fn hash160_compressed_pubkey() {
        let pubkey = hex!("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
        let expected = hex!("751e76e8199196d454941c45d1b3a323f1433bd6");
        assert_eq!(hash160(&pubkey), expected);
    }
}
