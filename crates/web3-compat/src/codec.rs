/*!
# Account Codec

Account payloads arrive from the node as a `[payload, encoding]` pair (or, from
some transports, as raw bytes). Everything past this module works on raw bytes.
*/

use crate::error::DecodeError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Encoding tags used on the wire for account data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataEncoding {
    #[serde(rename = "base58")]
    Base58,
    #[serde(rename = "base64")]
    Base64,
    #[serde(rename = "base64+zstd")]
    Base64Zstd,
}

impl DataEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base58 => "base58",
            Self::Base64 => "base64",
            Self::Base64Zstd => "base64+zstd",
        }
    }
}

/// Account data as delivered by the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountData {
    Encoded(String, DataEncoding),
    Raw(Vec<u8>),
}

/// Decode account data into its canonical byte form.
///
/// `base64+zstd` payloads are base64-decoded only; the result is still
/// compressed.
pub fn decode_account_data(data: &AccountData) -> Result<Vec<u8>, DecodeError> {
    match data {
        AccountData::Raw(bytes) => Ok(bytes.clone()),
        AccountData::Encoded(encoded, DataEncoding::Base58) => {
            Ok(bs58::decode(encoded).into_vec()?)
        }
        AccountData::Encoded(encoded, DataEncoding::Base64) => Ok(STANDARD.decode(encoded)?),
        AccountData::Encoded(encoded, DataEncoding::Base64Zstd) => {
            debug!(
                len = encoded.len(),
                encoding = DataEncoding::Base64Zstd.as_str(),
                "account data is returned without decompression"
            );
            Ok(STANDARD.decode(encoded)?)
        }
    }
}

/// Re-encode decoded bytes for a simulation response. Always plain base64.
pub fn encode_for_simulation(bytes: &[u8]) -> (String, DataEncoding) {
    (STANDARD.encode(bytes), DataEncoding::Base64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = &[0, 1, 2, 3, 250, 251, 252, 253, 254, 255];

    #[test]
    fn test_base58_and_base64_agree() {
        let base58 = AccountData::Encoded(bs58::encode(SAMPLE).into_string(), DataEncoding::Base58);
        let base64 = AccountData::Encoded(STANDARD.encode(SAMPLE), DataEncoding::Base64);
        assert_eq!(decode_account_data(&base58).unwrap(), SAMPLE);
        assert_eq!(
            decode_account_data(&base58).unwrap(),
            decode_account_data(&base64).unwrap()
        );
    }

    #[test]
    fn test_raw_passthrough() {
        let raw = AccountData::Raw(SAMPLE.to_vec());
        assert_eq!(decode_account_data(&raw).unwrap(), SAMPLE);
    }

    #[test]
    fn test_zstd_tag_is_not_decompressed() {
        let tagged = AccountData::Encoded(STANDARD.encode(SAMPLE), DataEncoding::Base64Zstd);
        assert_eq!(decode_account_data(&tagged).unwrap(), SAMPLE);
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        let bad64 = AccountData::Encoded("@@@".into(), DataEncoding::Base64);
        assert!(matches!(
            decode_account_data(&bad64),
            Err(DecodeError::Base64(_))
        ));
        let bad58 = AccountData::Encoded("0O".into(), DataEncoding::Base58);
        assert!(matches!(
            decode_account_data(&bad58),
            Err(DecodeError::Base58(_))
        ));
    }

    #[test]
    fn test_encode_for_simulation() {
        let (encoded, encoding) = encode_for_simulation(SAMPLE);
        assert_eq!(encoding, DataEncoding::Base64);
        assert_eq!(STANDARD.decode(encoded).unwrap(), SAMPLE);
    }

    #[test]
    fn test_wire_shapes() {
        let tagged: AccountData = serde_json::from_str(r#"["AQID","base64"]"#).unwrap();
        assert_eq!(tagged, AccountData::Encoded("AQID".into(), DataEncoding::Base64));
        let zstd: AccountData = serde_json::from_str(r#"["","base64+zstd"]"#).unwrap();
        assert_eq!(zstd, AccountData::Encoded(String::new(), DataEncoding::Base64Zstd));
        for encoding in [DataEncoding::Base58, DataEncoding::Base64, DataEncoding::Base64Zstd] {
            assert_eq!(serde_json::to_value(encoding).unwrap(), encoding.as_str());
        }
        let raw: AccountData = serde_json::from_str("[1,2,3]").unwrap();
        assert_eq!(raw, AccountData::Raw(vec![1, 2, 3]));
    }
}
