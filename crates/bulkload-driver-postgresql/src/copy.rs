//! Encoding for `COPY .. FROM STDIN` in text format.

use bulkload_core::stmt::Value;
use std::fmt::Write;

/// Appends one row: tab separated fields terminated by a newline.
pub(crate) fn encode_row(dst: &mut String, row: &[Value]) {
    for (index, value) in row.iter().enumerate() {
        if index > 0 {
            dst.push('\t');
        }
        encode_value(dst, value);
    }
    dst.push('\n');
}

fn encode_value(dst: &mut String, value: &Value) {
    match value {
        Value::Null => dst.push_str("\\N"),
        Value::Bool(true) => dst.push('t'),
        Value::Bool(false) => dst.push('f'),
        Value::I16(v) => dst.push_str(&v.to_string()),
        Value::I32(v) => dst.push_str(&v.to_string()),
        Value::I64(v) => dst.push_str(&v.to_string()),
        Value::Enum(v) => dst.push_str(&v.code.to_string()),
        Value::F64(v) if v.is_nan() => dst.push_str("NaN"),
        Value::F64(v) if v.is_infinite() && *v > 0.0 => dst.push_str("Infinity"),
        Value::F64(v) if v.is_infinite() => dst.push_str("-Infinity"),
        Value::F64(v) => dst.push_str(&v.to_string()),
        Value::String(v) => escape(dst, v),
        Value::Bytes(v) => {
            // bytea hex format; the backslash itself is escaped for COPY
            dst.push_str("\\\\x");
            for byte in v {
                let _ = write!(dst, "{byte:02x}");
            }
        }
    }
}

fn escape(dst: &mut String, src: &str) {
    for ch in src.chars() {
        match ch {
            '\\' => dst.push_str("\\\\"),
            '\t' => dst.push_str("\\t"),
            '\n' => dst.push_str("\\n"),
            '\r' => dst.push_str("\\r"),
            ch => dst.push(ch),
        }
    }
}
