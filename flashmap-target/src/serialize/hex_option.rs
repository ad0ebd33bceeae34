use super::hex_u_int::HexVisitor;
use super::serialize_u_int::SerializeUnsignedInt;
use serde::{self, de, ser::Serializer, Deserializer};
use std::fmt;
use std::marker::PhantomData;

pub fn serialize<T, S>(variant_value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: serde::Serialize + fmt::LowerHex + SerializeUnsignedInt,
{
    match variant_value {
        Some(val) => {
            let check_for_human_readable = serializer.is_human_readable();
            if check_for_human_readable {
                serializer.serialize_some(format!("{:#x}", val).as_str())
            } else {
                serializer.serialize_some(&val)
            }
        }
        None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: SerializeUnsignedInt,
{
    struct OptionVisitor<T>(PhantomData<T>);

    impl<'de, T: SerializeUnsignedInt> de::Visitor<'de> for OptionVisitor<T> {
        type Value = Option<T>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            write!(formatter, "an optional unsigned integer or hex string")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(
            self,
            deserializer: D,
        ) -> Result<Self::Value, D::Error> {
            deserializer
                .deserialize_any(HexVisitor(PhantomData))
                .map(Some)
        }
    }

    deserializer.deserialize_option(OptionVisitor(PhantomData))
}
