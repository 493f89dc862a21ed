//! 필드 레코드 모델
//!
//! JSON 객체의 최상위 스칼라 멤버 하나를 표현하는 레코드와 그 식별자, 타입 태그를 정의합니다.

use serde::Serialize;
use std::fmt;

/// 라인마다 다시 1부터 시작하는 첫 번째 필드 식별자
pub const FIRST_FIELD_ID: u32 = 1;

/// 필드 식별자
///
/// `local` 값은 한 입력 라인 안에서만 유일합니다. 라인이 바뀌면 다시 1부터 시작하므로
/// 실행 전체에서 구분하려면 `line`(실행 전체 기준 라인 순번)과 함께 비교해야 합니다.
/// 출력 파일에는 `local` 값만 기록됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FieldId {
    /// 실행 전체 기준 라인 순번 (1부터)
    pub line: usize,
    /// 라인 내 필드 번호 (1부터)
    pub local: u32,
}

impl FieldId {
    pub fn new(line: usize, local: u32) -> Self {
        Self { line, local }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.local)
    }
}

/// 필드 타입 태그
///
/// 판별값이 그대로 TLV 레코드의 1바이트 태그가 됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum FieldType {
    Invalid = 0,
    Integer = 3,
    Double = 4,
    String = 5,
    Boolean = 6,
}

impl FieldType {
    /// 와이어 태그 값
    pub const fn tag(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Invalid => write!(f, "Invalid"),
            FieldType::Integer => write!(f, "Integer"),
            FieldType::Double => write!(f, "Double"),
            FieldType::String => write!(f, "String"),
            FieldType::Boolean => write!(f, "Boolean"),
        }
    }
}

/// 필드 값
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Double(f64),
    /// 종결자 없이 정확한 길이만큼 소유한 문자열
    String(Box<str>),
    Boolean(bool),
    /// 지원하지 않는 멤버의 자리 표시자 (값 없음)
    Invalid,
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Integer(_) => FieldType::Integer,
            FieldValue::Double(_) => FieldType::Double,
            FieldValue::String(_) => FieldType::String,
            FieldValue::Boolean(_) => FieldType::Boolean,
            FieldValue::Invalid => FieldType::Invalid,
        }
    }
}

/// 필드 레코드
///
/// 생성된 뒤에는 값이 바뀌지 않습니다. 순서는 [`RecordSequence`](crate::sequence::RecordSequence)가 관리합니다.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRecord {
    id: FieldId,
    value: FieldValue,
}

impl FieldRecord {
    pub fn new(id: FieldId, value: FieldValue) -> Self {
        Self { id, value }
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn field_type(&self) -> FieldType {
        self.value.field_type()
    }

    /// 사전 출력용 인덱스 레코드 생성
    ///
    /// 값이 이 레코드의 라인 내 식별자인 Integer 레코드를 반환합니다.
    /// 시퀀스에 연결되지 않으며 인코딩 후 버려집니다.
    pub fn index_record(&self) -> FieldRecord {
        FieldRecord::new(self.id, FieldValue::Integer(i64::from(self.id.local)))
    }
}
