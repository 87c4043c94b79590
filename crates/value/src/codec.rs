//! Binary encoding for Value
//!
//! Tagged, order-preserving encoding. Every value starts with a one-byte
//! type tag; `0x00` is reserved for null and never begins any other value.

use crate::types::Value;
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Decoding error: {0}")]
    Decoding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const TAG_NULL: u8 = 0x00;
const TAG_BOOL: u8 = 0x01;
const TAG_I8: u8 = 0x02;
const TAG_I16: u8 = 0x03;
const TAG_I32: u8 = 0x04;
const TAG_I64: u8 = 0x05;
const TAG_F32: u8 = 0x0C;
const TAG_F64: u8 = 0x0D;
const TAG_STR: u8 = 0x0F;
const TAG_TIMESTAMP: u8 = 0x12;
const TAG_BYTEA: u8 = 0x15;
const TAG_LIST: u8 = 0x19;
const TAG_MAP: u8 = 0x1A;

/// Encode a value with its type tag.
pub fn encode_value(value: &Value) -> Vec<u8> {
    let mut output = Vec::new();
    encode_into(value, &mut output);
    output
}

fn put_len_prefixed(bytes: &[u8], output: &mut Vec<u8>) {
    output.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    output.extend_from_slice(bytes);
}

fn encode_into(value: &Value, output: &mut Vec<u8>) {
    match value {
        Value::Null => output.push(TAG_NULL),
        Value::Bool(b) => {
            output.push(TAG_BOOL);
            output.push(u8::from(*b));
        }
        // Signed integers flip the sign bit so byte order matches numeric order
        Value::I8(i) => {
            output.push(TAG_I8);
            output.push((*i as u8) ^ (1u8 << 7));
        }
        Value::I16(i) => {
            output.push(TAG_I16);
            output.extend_from_slice(&((*i as u16) ^ (1u16 << 15)).to_be_bytes());
        }
        Value::I32(i) => {
            output.push(TAG_I32);
            output.extend_from_slice(&((*i as u32) ^ (1u32 << 31)).to_be_bytes());
        }
        Value::I64(i) => {
            output.push(TAG_I64);
            output.extend_from_slice(&((*i as u64) ^ (1u64 << 63)).to_be_bytes());
        }
        Value::F32(f) => {
            output.push(TAG_F32);
            let bits = f.to_bits();
            let sortable = if f.is_sign_negative() {
                !bits
            } else {
                bits ^ (1u32 << 31)
            };
            output.extend_from_slice(&sortable.to_be_bytes());
        }
        Value::F64(f) => {
            output.push(TAG_F64);
            let bits = f.to_bits();
            let sortable = if f.is_sign_negative() {
                !bits
            } else {
                bits ^ (1u64 << 63)
            };
            output.extend_from_slice(&sortable.to_be_bytes());
        }
        Value::Str(s) => {
            output.push(TAG_STR);
            put_len_prefixed(s.as_bytes(), output);
        }
        Value::Timestamp(ts) => {
            output.push(TAG_TIMESTAMP);
            let utc = ts.and_utc();
            output.extend_from_slice(&utc.timestamp().to_be_bytes());
            output.extend_from_slice(&utc.timestamp_subsec_nanos().to_be_bytes());
        }
        Value::Bytea(b) => {
            output.push(TAG_BYTEA);
            put_len_prefixed(b, output);
        }
        Value::List(items) => {
            output.push(TAG_LIST);
            output.extend_from_slice(&(items.len() as u32).to_be_bytes());
            for item in items {
                encode_into(item, output);
            }
        }
        Value::Map(map) => {
            // BTreeMap iterates in key order, so equal maps encode equally
            output.push(TAG_MAP);
            output.extend_from_slice(&(map.len() as u32).to_be_bytes());
            for (key, item) in map {
                put_len_prefixed(key.as_bytes(), output);
                encode_into(item, output);
            }
        }
    }
}

/// Decode one value. The input must contain exactly one encoded value.
pub fn decode_value(bytes: &[u8]) -> Result<Value> {
    let mut cursor = Cursor::new(bytes);
    let value = decode_from(&mut cursor)?;
    let consumed = cursor.position() as usize;
    if consumed != bytes.len() {
        return Err(Error::Decoding(format!(
            "{} trailing bytes after value",
            bytes.len() - consumed
        )));
    }
    Ok(value)
}

fn read_array<const N: usize>(cursor: &mut Cursor<&[u8]>) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    cursor.read_exact(&mut buf)?;
    Ok(buf)
}

fn read_len(cursor: &mut Cursor<&[u8]>) -> Result<usize> {
    let len = u32::from_be_bytes(read_array(cursor)?) as usize;
    let remaining = cursor.get_ref().len() - cursor.position() as usize;
    // Every element takes at least one byte, so a larger length is corrupt
    if len > remaining {
        return Err(Error::Decoding(format!(
            "length {} exceeds remaining {} bytes",
            len, remaining
        )));
    }
    Ok(len)
}

fn read_bytes(cursor: &mut Cursor<&[u8]>) -> Result<Vec<u8>> {
    let len = read_len(cursor)?;
    let mut bytes = vec![0u8; len];
    cursor.read_exact(&mut bytes)?;
    Ok(bytes)
}

fn read_string(cursor: &mut Cursor<&[u8]>) -> Result<String> {
    String::from_utf8(read_bytes(cursor)?)
        .map_err(|e| Error::Decoding(format!("Invalid UTF-8: {}", e)))
}

fn decode_from(cursor: &mut Cursor<&[u8]>) -> Result<Value> {
    let [tag] = read_array::<1>(cursor)?;

    let value = match tag {
        TAG_NULL => Value::Null,
        TAG_BOOL => match read_array::<1>(cursor)? {
            [0] => Value::Bool(false),
            [1] => Value::Bool(true),
            [other] => {
                return Err(Error::Decoding(format!("Invalid boolean byte: {}", other)));
            }
        },
        TAG_I8 => Value::I8((read_array::<1>(cursor)?[0] ^ (1u8 << 7)) as i8),
        TAG_I16 => Value::I16((u16::from_be_bytes(read_array(cursor)?) ^ (1u16 << 15)) as i16),
        TAG_I32 => Value::I32((u32::from_be_bytes(read_array(cursor)?) ^ (1u32 << 31)) as i32),
        TAG_I64 => Value::I64((u64::from_be_bytes(read_array(cursor)?) ^ (1u64 << 63)) as i64),
        TAG_F32 => {
            let sortable = u32::from_be_bytes(read_array(cursor)?);
            let bits = if sortable & (1u32 << 31) != 0 {
                sortable ^ (1u32 << 31)
            } else {
                !sortable
            };
            Value::F32(f32::from_bits(bits))
        }
        TAG_F64 => {
            let sortable = u64::from_be_bytes(read_array(cursor)?);
            let bits = if sortable & (1u64 << 63) != 0 {
                sortable ^ (1u64 << 63)
            } else {
                !sortable
            };
            Value::F64(f64::from_bits(bits))
        }
        TAG_STR => Value::Str(read_string(cursor)?),
        TAG_TIMESTAMP => {
            let seconds = i64::from_be_bytes(read_array(cursor)?);
            let nanos = u32::from_be_bytes(read_array(cursor)?);
            let ts = chrono::DateTime::from_timestamp(seconds, nanos)
                .ok_or_else(|| Error::Decoding("Invalid timestamp".to_string()))?
                .naive_utc();
            Value::Timestamp(ts)
        }
        TAG_BYTEA => Value::Bytea(read_bytes(cursor)?),
        TAG_LIST => {
            let len = read_len(cursor)?;
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(decode_from(cursor)?);
            }
            Value::List(items)
        }
        TAG_MAP => {
            let len = read_len(cursor)?;
            let mut map = BTreeMap::new();
            for _ in 0..len {
                let key = read_string(cursor)?;
                let item = decode_from(cursor)?;
                if map.insert(key.clone(), item).is_some() {
                    return Err(Error::Decoding(format!("Duplicate map key: {}", key)));
                }
            }
            Value::Map(map)
        }
        other => {
            return Err(Error::Decoding(format!("Unknown type tag: 0x{:02X}", other)));
        }
    };
    Ok(value)
}
