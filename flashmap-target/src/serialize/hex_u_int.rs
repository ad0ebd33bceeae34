use super::serialize_u_int::SerializeUnsignedInt;
use serde::{de, Deserializer, Serializer};
use std::fmt;
use std::marker::PhantomData;

pub(crate) fn serialize<T, S>(memory_address: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: fmt::LowerHex + SerializeUnsignedInt,
{
    // We serialize the range as hex strings when generating human-readable formats such as YAML,
    let check_for_human_readable = serializer.is_human_readable();
    if check_for_human_readable {
        serializer.serialize_str(format!("{:#x}", memory_address).as_str())
    } else {
        memory_address.serialize_int(serializer)
    }
}

pub(crate) fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: SerializeUnsignedInt,
{
    deserializer.deserialize_any(HexVisitor(PhantomData))
}

/// Accepts plain integers as well as `0x` prefixed hex strings.
pub(super) struct HexVisitor<T>(pub(super) PhantomData<T>);

impl<'de, T: SerializeUnsignedInt> de::Visitor<'de> for HexVisitor<T> {
    type Value = T;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "an unsigned integer or a hex string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        T::from_u64(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        let v = u64::try_from(v).map_err(|_| E::custom(format!("negative value {v}")))?;
        T::from_u64(v)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        T::from_u64(parse_u64(v)?)
    }
}

pub(super) fn parse_u64<E: de::Error>(v: &str) -> Result<u64, E> {
    let v = v.trim();
    let parsed = match v.strip_prefix("0x").or_else(|| v.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => v.replace('_', "").parse::<u64>(),
    };
    parsed.map_err(|e| E::custom(format!("invalid number `{v}`: {e}")))
}
