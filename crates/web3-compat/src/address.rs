use crate::error::{CompatError, CompatResult, DecodeError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use solana_sdk::pubkey::Pubkey;
use std::{fmt, str::FromStr};

const ADDRESS_BYTES: usize = 32;

/// Base-58 text form of a 32-byte public key.
///
/// Always validated on construction, so conversion back to a [`Pubkey`] cannot fail.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    encoded: String,
    bytes: [u8; ADDRESS_BYTES],
}

impl Address {
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    pub fn to_bytes(&self) -> [u8; ADDRESS_BYTES] {
        self.bytes
    }
}

impl From<Pubkey> for Address {
    fn from(pubkey: Pubkey) -> Self {
        Self {
            encoded: pubkey.to_string(),
            bytes: pubkey.to_bytes(),
        }
    }
}

impl From<&Pubkey> for Address {
    fn from(pubkey: &Pubkey) -> Self {
        Self::from(*pubkey)
    }
}

impl From<&Address> for Pubkey {
    fn from(address: &Address) -> Self {
        Pubkey::new_from_array(address.to_bytes())
    }
}

impl From<Address> for Pubkey {
    fn from(address: Address) -> Self {
        Self::from(&address)
    }
}

impl FromStr for Address {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = bs58::decode(s).into_vec()?;
        let bytes: [u8; ADDRESS_BYTES] =
            decoded
                .as_slice()
                .try_into()
                .map_err(|_| DecodeError::InvalidLength {
                    expected: ADDRESS_BYTES,
                    actual: decoded.len(),
                })?;
        // Re-encode so that equal keys always compare equal as text.
        Ok(Self {
            encoded: bs58::encode(bytes).into_string(),
            bytes,
        })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.encoded)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encoded)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Anything a legacy caller may hand over where an address is expected
pub trait IntoAddress {
    fn into_address(self) -> CompatResult<Address>;
}

impl IntoAddress for Address {
    fn into_address(self) -> CompatResult<Address> {
        Ok(self)
    }
}

impl IntoAddress for &Address {
    fn into_address(self) -> CompatResult<Address> {
        Ok(self.clone())
    }
}

impl IntoAddress for Pubkey {
    fn into_address(self) -> CompatResult<Address> {
        Ok(self.into())
    }
}

impl IntoAddress for &Pubkey {
    fn into_address(self) -> CompatResult<Address> {
        Ok(self.into())
    }
}

impl IntoAddress for &str {
    fn into_address(self) -> CompatResult<Address> {
        self.parse()
            .map_err(|e| CompatError::Validation(format!("invalid address `{self}`: {e}")))
    }
}

impl IntoAddress for String {
    fn into_address(self) -> CompatResult<Address> {
        self.as_str().into_address()
    }
}

impl IntoAddress for &String {
    fn into_address(self) -> CompatResult<Address> {
        self.as_str().into_address()
    }
}

/// Convert a legacy key or address text into an [`Address`]
pub fn to_address(input: impl IntoAddress) -> CompatResult<Address> {
    input.into_address()
}

/// Convert an [`Address`] back into the legacy key type
pub fn to_public_key(address: &Address) -> Pubkey {
    address.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signature::{Keypair, Signer};

    #[test]
    fn test_pubkey_round_trip() {
        let pubkey = Keypair::new().pubkey();
        let address = to_address(pubkey).unwrap();
        assert_eq!(address.as_str(), pubkey.to_string());
        assert_eq!(to_public_key(&address), pubkey);
        assert_eq!(address.to_bytes(), pubkey.to_bytes());
    }

    #[test]
    fn test_parse_text() {
        let address: Address = "11111111111111111111111111111111".parse().unwrap();
        assert_eq!(to_public_key(&address), Pubkey::default());
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = "3yZe7d".parse::<Address>().unwrap_err();
        assert!(matches!(err, DecodeError::InvalidLength { expected: 32, .. }));
    }

    #[test]
    fn test_rejects_non_base58() {
        assert!(matches!(
            "0OIl0OIl".parse::<Address>(),
            Err(DecodeError::Base58(_))
        ));
        assert!(matches!(
            to_address("not an address"),
            Err(CompatError::Validation(_))
        ));
    }
}
