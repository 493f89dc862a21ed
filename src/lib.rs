//! jtlv - JSON LINES TO TLV CONVERTER
//!
//! 한 줄에 JSON 객체 하나씩 담긴 파일을 읽어 최상위 스칼라 멤버를 TLV 바이너리로 변환하는 CLI 도구입니다.
//!
//! # 주요 기능
//!
//! - 🧩 **평탄화**: 각 라인 객체의 정수/실수/문자열/불리언 멤버를 멤버 순서대로 필드 레코드로 변환
//! - 📦 **평문 TLV 출력**: 필드마다 `tag [length value]` 레코드 하나
//! - 📚 **사전 TLV 출력**: 필드마다 (인덱스, 값) 레코드 쌍
//! - 🛑 **전체 실패 정책**: 한 라인이라도 실패하면 어떤 출력도 만들지 않음
//! - 📁 **폴더 입력**: glob 패턴으로 여러 JSONL 파일을 이름 순으로 처리
//! - 📈 **구조화된 이벤트**: `tracing` 로그와 처리 통계
//!
//! # 예제
//!
//! ```bash
//! # 기본 경로 (data.json -> data.tlv, data.dict)
//! jtlv
//!
//! # 경로 지정
//! jtlv -i events.jsonl -o events.tlv -d events.dict
//!
//! # 쓰기 없이 검사만
//! jtlv -i events.jsonl --dry-run
//! ```

pub mod cli;
pub mod error;
pub mod events;
pub mod flatten;
pub mod input;
pub mod pattern;
pub mod pipeline;
pub mod reader;
pub mod record;
pub mod sequence;
pub mod stats;
pub mod tlv;
pub mod writer;

// Re-exports for convenient access
pub use cli::{Args, WriteMode};
pub use error::{JtlvError, Result};
pub use events::{Event, EventSink, NullSink, Site, TracingSink};
pub use flatten::{Flattener, NonScalarPolicy};
pub use input::collect_input_files;
pub use pattern::PatternMatcher;
pub use pipeline::{convert, load_records, ConvertOptions, ConvertReport, LoadReport};
pub use record::{FieldId, FieldRecord, FieldType, FieldValue};
pub use sequence::{Accumulator, RecordSequence};
pub use stats::{format_bytes, Statistics};
pub use writer::{write_dictionary, write_plain, OutputKind, WriteReport};
