use serde::{de, Serializer};

/// This trait is used to constrain the serialization of numbers to hex strings, to be generic for unsigned integers.
pub trait SerializeUnsignedInt: Sized {
    fn serialize_int<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer;

    /// Converts a parsed `u64` back into `Self`, rejecting values that do not fit.
    fn from_u64<E: de::Error>(value: u64) -> Result<Self, E>;
}

macro_rules! impl_serialize_unsigned_int {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(
            impl SerializeUnsignedInt for $ty {
                fn serialize_int<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: Serializer,
                {
                    serializer.$method(*self)
                }

                fn from_u64<E: de::Error>(value: u64) -> Result<Self, E> {
                    <$ty>::try_from(value).map_err(|_| {
                        E::custom(format!(
                            "{value:#x} does not fit into {}",
                            stringify!($ty)
                        ))
                    })
                }
            }
        )*
    };
}

impl_serialize_unsigned_int!(
    u8 => serialize_u8,
    u16 => serialize_u16,
    u32 => serialize_u32,
    u64 => serialize_u64,
);
