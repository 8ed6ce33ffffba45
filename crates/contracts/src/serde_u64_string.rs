//! Seed serialization adapter: u64 written as a decimal string so JSON
//! tooling that loses integer precision round-trips it, accepted back as
//! either a string or a number.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};

pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(value)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    struct U64OrString;

    impl Visitor<'_> for U64OrString {
        type Value = u64;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a u64 or a decimal string")
        }

        fn visit_u64<E>(self, value: u64) -> Result<u64, E> {
            Ok(value)
        }

        fn visit_str<E>(self, value: &str) -> Result<u64, E>
        where
            E: de::Error,
        {
            value.parse::<u64>().map_err(de::Error::custom)
        }
    }

    deserializer.deserialize_any(U64OrString)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
    struct Wrapper {
        #[serde(with = "super")]
        seed: u64,
    }

    #[test]
    fn serializes_as_string() {
        let encoded = serde_json::to_string(&Wrapper { seed: 42 }).expect("serialize");
        assert_eq!(encoded, r#"{"seed":"42"}"#);
    }

    #[test]
    fn accepts_string_or_number() {
        let from_string: Wrapper = serde_json::from_str(r#"{"seed":"7"}"#).expect("string seed");
        let from_number: Wrapper = serde_json::from_str(r#"{"seed":7}"#).expect("numeric seed");
        assert_eq!(from_string, from_number);
    }

    #[test]
    fn rejects_non_numeric_string() {
        let parsed = serde_json::from_str::<Wrapper>(r#"{"seed":"not-a-seed"}"#);
        assert!(parsed.is_err());
    }
}
