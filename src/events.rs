//! 관찰 이벤트 모듈
//!
//! 파이프라인이 진행 상황과 실패 지점을 외부로 알리는 구조화된 이벤트를 정의합니다.
//! 이벤트를 어떤 형식으로 어디에 남길지는 [`EventSink`] 구현이 결정합니다.

use std::fmt;
use std::path::PathBuf;

use crate::error::JtlvError;
use crate::record::{FieldId, FieldType};
use crate::writer::OutputKind;

/// 실패가 발생한 지점
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    OpenInput,
    ReadLine,
    ParseLine,
    Flatten,
    Aggregate,
    OpenOutput,
    EncodeRecord,
    FlushOutput,
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Site::OpenInput => "open_input",
            Site::ReadLine => "read_line",
            Site::ParseLine => "parse_line",
            Site::Flatten => "flatten",
            Site::Aggregate => "aggregate",
            Site::OpenOutput => "open_output",
            Site::EncodeRecord => "encode_record",
            Site::FlushOutput => "flush_output",
        };
        f.write_str(name)
    }
}

/// 파이프라인 이벤트
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// 입력 파일 열림
    InputOpened { path: PathBuf, bytes: u64 },
    /// 라인 처리 시작 (`line`은 실행 전체 기준 순번)
    LineStarted { line: usize, bytes: usize },
    /// 빈 라인 건너뜀
    LineSkipped { line: usize },
    /// 필드 레코드 할당
    RecordAllocated { id: FieldId, field_type: FieldType },
    /// TLV 레코드 하나를 출력에 기록
    RecordPersisted {
        output: OutputKind,
        id: FieldId,
        field_type: FieldType,
        bytes: usize,
    },
    /// 출력 파일 쓰기 완료
    OutputCompleted {
        output: OutputKind,
        path: PathBuf,
        records: usize,
        bytes: u64,
    },
    /// 실패
    Failure { site: Site, message: String },
}

/// 이벤트 수신자
pub trait EventSink {
    fn emit(&mut self, event: Event);
}

/// 이벤트를 모두 버리는 수신자
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: Event) {}
}

/// 이벤트를 순서대로 모으는 수신자 (테스트와 임베딩 용도)
impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

/// `tracing` 매크로로 이벤트를 기록하는 수신자
///
/// 파일/출력 단위는 `info`, 라인 단위는 `debug`, 레코드 단위는 `trace`, 실패는 `error` 레벨입니다.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: Event) {
        match event {
            Event::InputOpened { path, bytes } => {
                tracing::info!(path = %path.display(), bytes, "입력 파일 열림");
            }
            Event::LineStarted { line, bytes } => {
                tracing::debug!(line, bytes, "라인 처리 시작");
            }
            Event::LineSkipped { line } => {
                tracing::debug!(line, "빈 라인 건너뜀");
            }
            Event::RecordAllocated { id, field_type } => {
                tracing::trace!(id = %id, field_type = %field_type, "레코드 할당");
            }
            Event::RecordPersisted {
                output,
                id,
                field_type,
                bytes,
            } => {
                tracing::trace!(
                    output = %output,
                    id = %id,
                    field_type = %field_type,
                    bytes,
                    "레코드 저장"
                );
            }
            Event::OutputCompleted {
                output,
                path,
                records,
                bytes,
            } => {
                tracing::info!(
                    output = %output,
                    path = %path.display(),
                    records,
                    bytes,
                    "출력 파일 저장 완료"
                );
            }
            Event::Failure { site, message } => {
                tracing::error!(site = %site, %message, "처리 실패");
            }
        }
    }
}

/// 실패 이벤트를 남기고 에러를 그대로 돌려줌
pub fn report_failure(sink: &mut dyn EventSink, site: Site, error: JtlvError) -> JtlvError {
    sink.emit(Event::Failure {
        site,
        message: error.to_string(),
    });
    error
}
