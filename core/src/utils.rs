use std::fmt;
use num_enum::TryFromPrimitive;

/// Variant name for a known primitive, hex otherwise.
pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

/// Human readable form of a host status code (for logs).
pub fn describe_status(raw: i32) -> String {
    enum_name_or_hex::<crate::types::StatusCode>(raw)
}

/// Ratio of output to input bytes; 0 when nothing went in.
pub fn ratio(output: u64, input: u64) -> f64 {
    if input == 0 {
        0.0
    } else {
        output as f64 / input as f64
    }
}
