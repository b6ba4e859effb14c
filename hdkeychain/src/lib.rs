pub mod base58check;
pub mod codec;
pub mod curve;
pub mod derivation;
pub mod error;
pub mod extended_key;
pub mod keys;

pub use curve::{CurveParams, CurvePoint};
pub use derivation::DerivationPath;
pub use error::Error;
pub use extended_key::{ExtendedKey, HARDENED_OFFSET, Network};
pub use keys::{PrivateKey, PublicKey, load_address, load_wif};
