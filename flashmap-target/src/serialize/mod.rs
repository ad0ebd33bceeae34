mod base64_bytes;
mod hex_option;
mod hex_range;
mod hex_u_int;
mod hex_vec;
mod serialize_u_int;

pub(crate) use base64_bytes::{deserialize as base64_deserialize, serialize as base64_serialize};
pub(crate) use hex_option::{deserialize as hex_option_deserialize, serialize as hex_option};
pub(crate) use hex_range::{deserialize as hex_range_deserialize, serialize as hex_range};
pub(crate) use hex_u_int::{deserialize as hex_u_int_deserialize, serialize as hex_u_int};
pub(crate) use hex_vec::{deserialize as hex_vec_deserialize, serialize as hex_vec};
