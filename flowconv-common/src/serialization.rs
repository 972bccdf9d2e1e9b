use serde::{Serialize, de::DeserializeOwned};

use crate::error::{Error, Result};

/// Serialization format for configuration fragments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Strict JSON.
    #[default]
    Json,

    /// JSON5 (comments, unquoted keys, trailing commas).
    Json5,
}

/// Encode a value to bytes using the specified format.
pub fn encode<T: Serialize>(value: &T, format: Format) -> Result<Vec<u8>> {
    match format {
        Format::Json => serde_json::to_vec(value).map_err(Error::from),
        Format::Json5 => Ok(json5::to_string(value)?.into_bytes()),
    }
}

/// Decode bytes to a value using the specified format.
pub fn decode<T: DeserializeOwned>(data: &[u8], format: Format) -> Result<T> {
    match format {
        Format::Json => serde_json::from_slice(data).map_err(Error::from),
        Format::Json5 => {
            let text = std::str::from_utf8(data).map_err(|e| Error::Json5(e.to_string()))?;
            json5::from_str(text).map_err(Error::from)
        }
    }
}

/// Recover a typed value from an untyped configuration fragment.
///
/// The fragment is encoded and decoded again as `T`. Unknown fields are
/// accepted only if `T` accepts them; any mismatch fails the whole decode.
pub fn decode_untyped<T: DeserializeOwned>(value: &serde_json::Value) -> Result<T> {
    let type_name = std::any::type_name::<T>()
        .rsplit("::")
        .next()
        .unwrap_or_default()
        .to_string();

    let bytes = encode(value, Format::Json).map_err(|e| Error::Decode {
        type_name: type_name.clone(),
        message: e.to_string(),
    })?;

    decode(&bytes, Format::Json).map_err(|e| Error::Decode {
        type_name,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Batch {
        send_batch_size: u32,
        #[serde(default)]
        timeout: Option<String>,
    }

    #[test]
    fn test_json5_roundtrip() {
        let batch = Batch {
            send_batch_size: 100,
            timeout: Some("5s".to_string()),
        };

        let encoded = encode(&batch, Format::Json5).unwrap();
        let decoded: Batch = decode(&encoded, Format::Json5).unwrap();
        assert_eq!(decoded, batch);
    }

    #[test]
    fn test_decode_untyped() {
        let value = json!({ "send_batch_size": 512 });
        let batch: Batch = decode_untyped(&value).unwrap();
        assert_eq!(batch.send_batch_size, 512);
        assert_eq!(batch.timeout, None);
    }

    #[test]
    fn test_decode_untyped_fails_closed() {
        let value = json!({ "send_batch_size": "lots" });
        let err = decode_untyped::<Batch>(&value).unwrap_err();
        match err {
            Error::Decode { type_name, .. } => assert_eq!(type_name, "Batch"),
            other => panic!("unexpected error: {other}"),
        }

        let unknown = json!({ "send_batch_size": 1, "bogus": true });
        assert!(decode_untyped::<Batch>(&unknown).is_err());
    }
}
