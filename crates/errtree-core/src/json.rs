//! JSON decoding without a nesting limit
//!
//! Validator error trees nest one JSON object and one array per schema level,
//! so serde_json's default recursion limit rejects realistic inputs. These
//! helpers lift the limit and grow the stack on demand while decoding.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Decode a JSON document of any nesting depth
pub fn from_str<T: DeserializeOwned>(input: &str) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_str(input);
    deserializer.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(value)
}

/// Convert an already-decoded JSON value of any nesting depth
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(T::deserialize(serde_stacker::Deserializer::new(value))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested_arrays(depth: usize) -> String {
        format!("{}{}", "[".repeat(depth), "]".repeat(depth))
    }

    #[test]
    fn test_default_limit_is_lifted() {
        let input = nested_arrays(2_000);
        assert!(serde_json::from_str::<Value>(&input).is_err());

        let value: Value = from_str(&input).unwrap();
        assert!(value.is_array());
    }

    #[test]
    fn test_trailing_input_is_rejected() {
        assert!(from_str::<Value>("{} {").is_err());
        assert!(from_str::<Value>("  {\"a\": 1}\n").is_ok());
    }

    #[test]
    fn test_from_value() {
        let numbers: Vec<u32> = from_value(serde_json::json!([1, 2, 3])).unwrap();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(from_value::<Vec<u32>>(serde_json::json!({"a": 1})).is_err());
    }
}
