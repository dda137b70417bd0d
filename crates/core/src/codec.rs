//! Field value codec
//!
//! Converts a [`Value`] to the bytes stored under a field key (and embedded
//! in index keys) and back again. Decoding is driven by the field's declared
//! [`FieldType`].
//!
//! # Wire forms
//!
//! | Type | Bytes |
//! |------|-------|
//! | Text | UTF-8 |
//! | Bytes | raw |
//! | Int | 8 bytes big-endian, sign bit flipped |
//! | UInt | 8 bytes big-endian |
//! | Float | 8 bytes big-endian IEEE-754 bits |
//! | Bool | `0` or `1` |
//! | Timestamp | 8 bytes seconds (sign flipped) + 4 bytes nanoseconds |
//!
//! Flipping the sign bit makes the byte order of encoded integers match
//! their numeric order.

use byteorder::{BigEndian, ByteOrder};
use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::value::{FieldType, Value};

const SIGN_BIT: u64 = 1 << 63;
const WORD: usize = 8;
const TIMESTAMP_LEN: usize = 12;

/// Encode a value into its wire form
pub fn encode(value: &Value) -> Vec<u8> {
    match value {
        Value::Text(s) => s.as_bytes().to_vec(),
        Value::Bytes(b) => b.clone(),
        Value::Int(i) => word(*i as u64 ^ SIGN_BIT),
        Value::UInt(u) => word(*u),
        Value::Float(f) => word(f.to_bits()),
        Value::Bool(b) => vec![u8::from(*b)],
        Value::Timestamp(t) => {
            let mut buf = [0u8; TIMESTAMP_LEN];
            BigEndian::write_u64(&mut buf[..WORD], t.timestamp() as u64 ^ SIGN_BIT);
            BigEndian::write_u32(&mut buf[WORD..], t.timestamp_subsec_nanos());
            buf.to_vec()
        }
    }
}

/// Decode bytes as a value of the declared type
///
/// # Errors
///
/// Returns [`Error::TypeConversion`] if the bytes are not a valid encoding
/// of `ty` (wrong length, invalid UTF-8, bool byte other than 0/1,
/// timestamp out of range).
pub fn decode(bytes: &[u8], ty: FieldType) -> Result<Value> {
    match ty {
        FieldType::Text => String::from_utf8(bytes.to_vec())
            .map(Value::Text)
            .map_err(|e| Error::TypeConversion(format!("text is not valid UTF-8: {}", e))),
        FieldType::Bytes => Ok(Value::Bytes(bytes.to_vec())),
        FieldType::Int => Ok(Value::Int((read_word(bytes, ty)? ^ SIGN_BIT) as i64)),
        FieldType::UInt => Ok(Value::UInt(read_word(bytes, ty)?)),
        FieldType::Float => Ok(Value::Float(f64::from_bits(read_word(bytes, ty)?))),
        FieldType::Bool => match bytes {
            [0] => Ok(Value::Bool(false)),
            [1] => Ok(Value::Bool(true)),
            _ => Err(Error::TypeConversion(format!(
                "invalid bool encoding {:?}",
                bytes
            ))),
        },
        FieldType::Timestamp => {
            check_len(bytes, TIMESTAMP_LEN, ty)?;
            let secs = (BigEndian::read_u64(&bytes[..WORD]) ^ SIGN_BIT) as i64;
            let nanos = BigEndian::read_u32(&bytes[WORD..]);
            DateTime::<Utc>::from_timestamp(secs, nanos)
                .map(Value::Timestamp)
                .ok_or_else(|| {
                    Error::TypeConversion(format!("timestamp {}s {}ns out of range", secs, nanos))
                })
        }
    }
}

fn word(v: u64) -> Vec<u8> {
    let mut buf = [0u8; WORD];
    BigEndian::write_u64(&mut buf, v);
    buf.to_vec()
}

fn read_word(bytes: &[u8], ty: FieldType) -> Result<u64> {
    check_len(bytes, WORD, ty)?;
    Ok(BigEndian::read_u64(bytes))
}

fn check_len(bytes: &[u8], expected: usize, ty: FieldType) -> Result<()> {
    if bytes.len() != expected {
        return Err(Error::TypeConversion(format!(
            "{} needs {} bytes, found {}",
            ty,
            expected,
            bytes.len()
        )));
    }
    Ok(())
}
