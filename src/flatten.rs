//! JSON 객체 평탄화 모듈
//!
//! 한 라인의 JSON 객체를 파싱하고, 최상위 스칼라 멤버를 멤버 순서대로 필드 레코드로 변환합니다.

use clap::ValueEnum;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::{Number, Value};
use std::fmt;
use std::path::Path;

use crate::error::{JtlvError, Result};
use crate::events::{Event, EventSink};
use crate::record::{FieldId, FieldRecord, FieldValue};

/// 객체/배열/null 멤버 처리 방식
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum NonScalarPolicy {
    /// 레코드를 만들지 않고 건너뜀 (번호는 계속 증가)
    #[default]
    Skip,
    /// Invalid 타입 자리 표시자 레코드를 만듦
    Placeholder,
}

impl std::fmt::Display for NonScalarPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NonScalarPolicy::Skip => write!(f, "Skip"),
            NonScalarPolicy::Placeholder => write!(f, "Placeholder"),
        }
    }
}

/// 라인이 공백으로만 이루어져 있는지 확인
pub fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

/// 원본 순서대로 모든 멤버를 보존하는 JSON 객체
///
/// 같은 키가 여러 번 나와도 각각 별도의 멤버로 남습니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonObject {
    members: Vec<(String, Value)>,
}

impl JsonObject {
    /// 멤버를 원본 순서대로 순회
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.members.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<'de> Deserialize<'de> for JsonObject {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(MembersVisitor)
    }
}

struct MembersVisitor;

impl<'de> Visitor<'de> for MembersVisitor {
    type Value = JsonObject;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<JsonObject, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut members = Vec::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            members.push((key, value));
        }
        Ok(JsonObject { members })
    }
}

/// 라인 바이트를 JSON 객체로 파싱
///
/// 최상위 값이 객체가 아니거나 `f64` 범위를 넘는 숫자가 있으면 실패합니다.
///
/// # Arguments
/// * `path` - 에러 보고용 입력 파일 경로
/// * `line` - 에러 보고용 파일 내 라인 번호
/// * `bytes` - 라인 내용 (개행 제외)
pub fn parse_object(path: &Path, line: usize, bytes: &[u8]) -> Result<JsonObject> {
    serde_json::from_slice(bytes).map_err(|e| JtlvError::ParseFailure {
        path: path.to_path_buf(),
        line,
        reason: e.to_string(),
    })
}

/// 객체 평탄화기
#[derive(Debug, Clone, Copy, Default)]
pub struct Flattener {
    policy: NonScalarPolicy,
}

impl Flattener {
    pub fn new(policy: NonScalarPolicy) -> Self {
        Self { policy }
    }

    /// 객체의 최상위 멤버를 필드 레코드 목록으로 변환
    ///
    /// 식별자는 `start_id`부터 시작해 방문한 멤버마다 1씩 증가합니다.
    /// 레코드를 만들지 않은 멤버도 번호 하나를 차지합니다.
    ///
    /// # Arguments
    /// * `object` - 파싱된 JSON 객체 (멤버 순서와 중복 키 보존)
    /// * `line` - 실행 전체 기준 라인 순번
    /// * `start_id` - 첫 멤버의 라인 내 식별자
    /// * `sink` - 이벤트 수신자
    ///
    /// # Returns
    /// 멤버 순서대로 정렬된 필드 레코드 목록. 할당 실패 시 부분 목록은 버려집니다.
    pub fn flatten(
        &self,
        object: &JsonObject,
        line: usize,
        start_id: u32,
        sink: &mut dyn EventSink,
    ) -> Result<Vec<FieldRecord>> {
        let mut records: Vec<FieldRecord> = Vec::new();
        let mut local = start_id;

        for (_, value) in object.iter() {
            let id = FieldId::new(line, local);
            local = local.saturating_add(1);

            let field = match scalar_value(value, line)? {
                Some(field) => field,
                None if self.policy == NonScalarPolicy::Placeholder => FieldValue::Invalid,
                None => continue,
            };

            records
                .try_reserve(1)
                .map_err(|e| allocation_failure(line, e))?;

            let record = FieldRecord::new(id, field);
            sink.emit(Event::RecordAllocated {
                id,
                field_type: record.field_type(),
            });
            records.push(record);
        }

        Ok(records)
    }
}

/// 스칼라 JSON 값을 필드 값으로 변환 (객체/배열/null은 `None`)
fn scalar_value(value: &Value, line: usize) -> Result<Option<FieldValue>> {
    let field = match value {
        Value::Bool(b) => FieldValue::Boolean(*b),
        Value::Number(n) => number_value(n),
        Value::String(s) => {
            let mut owned = String::new();
            owned
                .try_reserve_exact(s.len())
                .map_err(|e| allocation_failure(line, e))?;
            owned.push_str(s);
            FieldValue::String(owned.into_boxed_str())
        }
        Value::Null | Value::Array(_) | Value::Object(_) => return Ok(None),
    };

    Ok(Some(field))
}

/// i64 범위 밖의 정수는 Double로 저장
fn number_value(n: &Number) -> FieldValue {
    if let Some(i) = n.as_i64() {
        FieldValue::Integer(i)
    } else {
        FieldValue::Double(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn allocation_failure(line: usize, error: std::collections::TryReserveError) -> JtlvError {
    JtlvError::AllocationFailure {
        line,
        reason: error.to_string(),
    }
}
