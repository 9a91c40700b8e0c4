//! # Address Codec
//!
//! Accounts are 20 raw bytes. Their human-readable form is a `0x`-prefixed
//! hex string carrying an EIP-55 mixed-case checksum (Keccak-256 of the
//! lowercase hex body).
//!
//! Decoding accepts all-lowercase or all-uppercase bodies unchecked; any
//! mixed-case body must match the checksum exactly.

use crate::errors::AddressError;
use sha2::Sha256;
use sha3::{Digest, Keccak256};

/// A 20-byte account address.
pub type Address = [u8; 20];

const ADDRESS_HEX_LEN: usize = 40;

/// Encode an address into its checksummed string form.
pub fn encode_address(address: &Address) -> String {
    let lower = hex::encode(address);
    let hash = Keccak256::digest(lower.as_bytes());

    let mut out = String::with_capacity(2 + ADDRESS_HEX_LEN);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        if c.is_ascii_alphabetic() && checksum_nibble(&hash, i) >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Decode a checksummed address string into raw bytes.
pub fn decode_address(s: &str) -> Result<Address, AddressError> {
    if s.is_empty() {
        return Err(AddressError::Empty);
    }
    let body = s
        .strip_prefix("0x")
        .ok_or_else(|| AddressError::MissingPrefix(s.to_string()))?;
    if body.len() != ADDRESS_HEX_LEN {
        return Err(AddressError::InvalidLength { got: body.len() });
    }

    let mut address = [0u8; 20];
    hex::decode_to_slice(body, &mut address)
        .map_err(|_| AddressError::InvalidHex(s.to_string()))?;

    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && encode_address(&address) != s {
        return Err(AddressError::BadChecksum(s.to_string()));
    }

    Ok(address)
}

/// Derive the account address owned by a module (e.g. the bridge custodian).
///
/// `sha256(name)[..20]`, so every validator derives the same account.
pub fn module_address(name: &str) -> Address {
    let digest = Sha256::digest(name.as_bytes());
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[..20]);
    address
}

fn checksum_nibble(hash: &[u8], index: usize) -> u8 {
    let byte = hash[index / 2];
    if index % 2 == 0 {
        byte >> 4
    } else {
        byte & 0x0f
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: [&str; 4] = [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[test]
    fn test_known_checksums_roundtrip() {
        for s in CHECKSUMMED {
            let address = decode_address(s).unwrap();
            assert_eq!(encode_address(&address), s);
        }
    }

    #[test]
    fn test_lowercase_accepted() {
        let lower = CHECKSUMMED[0].to_lowercase();
        let address = decode_address(&lower).unwrap();
        assert_eq!(encode_address(&address), CHECKSUMMED[0]);
    }

    #[test]
    fn test_bad_checksum_rejected() {
        // Flip the case of one letter in a valid checksummed address.
        let tampered = "0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        assert!(matches!(
            decode_address(tampered),
            Err(AddressError::BadChecksum(_))
        ));
    }

    #[test]
    fn test_malformed_inputs() {
        assert_eq!(decode_address(""), Err(AddressError::Empty));
        assert!(matches!(
            decode_address("not an address string"),
            Err(AddressError::MissingPrefix(_))
        ));
        assert!(matches!(
            decode_address("0x1234"),
            Err(AddressError::InvalidLength { got: 4 })
        ));
        assert!(matches!(
            decode_address("0xzz00000000000000000000000000000000000000"),
            Err(AddressError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_module_address_is_stable() {
        assert_eq!(module_address("bridge"), module_address("bridge"));
        assert_ne!(module_address("bridge"), module_address("prices"));
    }
}
