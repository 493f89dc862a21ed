//! TLV 인코딩 모듈
//!
//! 필드 레코드 하나를 `tag [length value]` 형식의 와이어 레코드로 직렬화합니다.
//!
//! # 와이어 형식
//!
//! | 필드 | 크기 | 설명 |
//! |------|------|------|
//! | tag | 1 바이트 | [`FieldType`](crate::record::FieldType) 판별값 |
//! | length | 8 바이트 (u64, little-endian) | 페이로드 길이, 0이면 생략 |
//! | value | length 바이트 | i64 / f64 little-endian, bool 1바이트, 문자열 UTF-8 |
//!
//! 페이로드 길이가 0인 레코드(Invalid, 빈 문자열)는 태그만 기록합니다.

use std::io::{self, Write};

use crate::record::{FieldRecord, FieldValue};

/// 태그 크기
pub const TAG_WIDTH: usize = 1;
/// 길이 필드 크기
pub const LENGTH_WIDTH: usize = 8;
/// Integer 페이로드 크기
pub const INTEGER_WIDTH: usize = 8;
/// Double 페이로드 크기
pub const DOUBLE_WIDTH: usize = 8;
/// Boolean 페이로드 크기
pub const BOOLEAN_WIDTH: usize = 1;

/// 페이로드 길이
pub fn payload_len(value: &FieldValue) -> usize {
    match value {
        FieldValue::Integer(_) => INTEGER_WIDTH,
        FieldValue::Double(_) => DOUBLE_WIDTH,
        FieldValue::Boolean(_) => BOOLEAN_WIDTH,
        FieldValue::String(s) => s.len(),
        FieldValue::Invalid => 0,
    }
}

/// 인코딩된 레코드 전체 길이
pub fn encoded_len(record: &FieldRecord) -> usize {
    match payload_len(record.value()) {
        0 => TAG_WIDTH,
        len => TAG_WIDTH + LENGTH_WIDTH + len,
    }
}

/// 레코드 하나를 인코딩하여 기록
///
/// # Returns
/// 기록한 바이트 수
pub fn encode<W: Write + ?Sized>(output: &mut W, record: &FieldRecord) -> io::Result<usize> {
    let value = record.value();
    output.write_all(&[record.field_type().tag()])?;

    let length = payload_len(value);
    if length == 0 {
        return Ok(TAG_WIDTH);
    }

    output.write_all(&(length as u64).to_le_bytes())?;
    match value {
        FieldValue::Integer(i) => output.write_all(&i.to_le_bytes())?,
        FieldValue::Double(d) => output.write_all(&d.to_le_bytes())?,
        FieldValue::Boolean(b) => output.write_all(&[u8::from(*b)])?,
        FieldValue::String(s) => output.write_all(s.as_bytes())?,
        FieldValue::Invalid => {}
    }

    Ok(TAG_WIDTH + LENGTH_WIDTH + length)
}

/// 기록한 바이트 수를 세는 TLV 인코더
pub struct TlvEncoder<W: Write> {
    inner: W,
    bytes_written: u64,
}

impl<W: Write> TlvEncoder<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bytes_written: 0,
        }
    }

    /// 레코드 하나 인코딩
    pub fn encode(&mut self, record: &FieldRecord) -> io::Result<usize> {
        let written = encode(&mut self.inner, record)?;
        self.bytes_written += written as u64;
        Ok(written)
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
