use super::hex_u_int::parse_u64;
use serde::{de, ser::SerializeSeq, Deserializer, Serializer};
use std::fmt;

pub fn serialize<S>(values: &[u64], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let check_for_human_readable = serializer.is_human_readable();
    let mut seq = serializer.serialize_seq(Some(values.len()))?;
    for value in values {
        if check_for_human_readable {
            seq.serialize_element(format!("{:#x}", value).as_str())?;
        } else {
            seq.serialize_element(value)?;
        }
    }
    seq.end()
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct HexSeqVisitor;

    impl<'de> de::Visitor<'de> for HexSeqVisitor {
        type Value = Vec<u64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            write!(formatter, "a list of unsigned integers or hex strings")
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(value) = seq.next_element::<HexOrInt>()? {
                values.push(value.0);
            }
            Ok(values)
        }
    }

    deserializer.deserialize_seq(HexSeqVisitor)
}

struct HexOrInt(u64);

impl<'de> de::Deserialize<'de> for HexOrInt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct Visitor;

        impl<'de> de::Visitor<'de> for Visitor {
            type Value = HexOrInt;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "an unsigned integer or a hex string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(HexOrInt(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                parse_u64(v).map(HexOrInt)
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}
