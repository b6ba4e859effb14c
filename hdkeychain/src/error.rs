use crypto_utils::base58::Base58Error;
use thiserror::Error;

/// Errors surfaced by derivation, key parsing, and the text formats.
///
/// No operation retries internally: `InvalidChild` in particular is
/// returned to the caller, who may derive the next index instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("seed length {0} is outside the accepted 16..=64 byte range")]
    InvalidSeedLength(usize),

    #[error("seed produced a zero master scalar, use a different seed")]
    InvalidSeed,

    #[error("cannot derive a key past depth 255")]
    MaxDepthExceeded,

    #[error("cannot derive a hardened key from a public key")]
    HardenedFromPublicKey,

    #[error("the extended key at this index is invalid")]
    InvalidChild,

    #[error("invalid public key format flag {0:#04x}")]
    InvalidFormatFlag(u8),

    #[error("public key point is not on the curve")]
    PointOffCurve,

    #[error("invalid square root while decompressing public key")]
    InvalidSquareRoot,

    #[error("decompressed y coordinate has the wrong parity")]
    ParityMismatch,

    #[error("public key coordinate is not below the field prime")]
    CoordinateOutOfRange,

    #[error("invalid public key length {0}")]
    InvalidLength(usize),

    #[error("invalid base58 character {ch:?} at index {index}")]
    InvalidCharacter { ch: char, index: usize },

    #[error("decoded data too short to carry a checksum")]
    MissingChecksum,

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("cannot create private keys from a public extended key")]
    NotPrivateExtendedKey,

    #[error("unknown WIF compression suffix {0:#04x}")]
    InvalidCompressionSuffix(u8),

    #[error("unexpected version byte {0:#04x}")]
    InvalidVersionByte(u8),

    #[error("invalid payload length {0}")]
    InvalidPayloadLength(usize),

    #[error("unknown extended key version")]
    InvalidVersion,

    #[error("invalid extended key data")]
    InvalidKeyData,

    #[error("invalid derivation path")]
    InvalidDerivationPath,
}

impl From<Base58Error> for Error {
    fn from(err: Base58Error) -> Self {
        match err {
            Base58Error::InvalidCharacter(ch, index) => Error::InvalidCharacter { ch, index },
            Base58Error::InvalidLength => Error::MissingChecksum,
            Base58Error::InvalidChecksum => Error::ChecksumMismatch,
        }
    }
}
