use std::fmt;
use std::str::FromStr;

use crate::curve::CurveParams;
use crate::error::Error;
use crate::extended_key::{ExtendedKey, HARDENED_OFFSET};

/// A derivation path such as "m/44'/0'/0'/0/1". Hardened components may
/// be marked with `'`, `h`, or `H`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationPath(pub Vec<u32>);

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("m") {
            return Ok(DerivationPath(Vec::new()));
        }
        let rest = s
            .strip_prefix("m/")
            .or_else(|| s.strip_prefix("M/"))
            .unwrap_or(s);
        if rest.is_empty() {
            return Ok(DerivationPath(Vec::new()));
        }

        let mut indices = Vec::new();
        for part in rest.split('/') {
            if part.is_empty() {
                return Err(Error::InvalidDerivationPath);
            }
            let hardened =
                part.ends_with('\'') || part.ends_with('h') || part.ends_with('H');
            let digits = if hardened {
                &part[..part.len() - 1]
            } else {
                part
            };
            let index: u32 = digits.parse().map_err(|_| Error::InvalidDerivationPath)?;
            let full_index = if hardened {
                index
                    .checked_add(HARDENED_OFFSET)
                    .ok_or(Error::InvalidDerivationPath)?
            } else {
                index
            };
            indices.push(full_index);
        }
        Ok(DerivationPath(indices))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for &index in &self.0 {
            if index >= HARDENED_OFFSET {
                write!(f, "/{}'", index - HARDENED_OFFSET)?;
            } else {
                write!(f, "/{index}")?;
            }
        }
        Ok(())
    }
}

impl DerivationPath {
    /// Walks `child` through every index in the path. A hardened step on
    /// a public-only key fails the same way a direct `child` call does.
    pub fn derive(&self, key: &ExtendedKey, params: &CurveParams) -> Result<ExtendedKey, Error> {
        let mut node = key.clone();
        for &index in &self.0 {
            node = node.child(index, params)?;
        }
        Ok(node)
    }
}
