//! 출력 파일 쓰기 모듈
//!
//! 마스터 시퀀스를 한 번 순회하며 평문 TLV 파일과 사전 TLV 파일을 기록합니다.
//! 실패하면 즉시 중단하며 이미 기록된 바이트는 그대로 남습니다.

use serde::Serialize;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::cli::WriteMode;
use crate::error::{JtlvError, Result};
use crate::events::{report_failure, Event, EventSink, Site};
use crate::record::FieldRecord;
use crate::sequence::RecordSequence;
use crate::tlv::TlvEncoder;

/// 출력 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// 필드마다 TLV 레코드 하나
    Plain,
    /// 필드마다 (인덱스, 값) TLV 레코드 쌍
    Dictionary,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputKind::Plain => write!(f, "plain"),
            OutputKind::Dictionary => write!(f, "dictionary"),
        }
    }
}

/// 출력 파일 쓰기 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteReport {
    pub output: OutputKind,
    pub path: PathBuf,
    /// 기록한 원본 필드 레코드 수
    pub records: usize,
    pub bytes: u64,
}

/// 평문 TLV 파일 쓰기
///
/// 시퀀스가 비어 있으면 파일을 열지 않고 `None`을 반환합니다.
pub fn write_plain(
    path: &Path,
    sequence: &RecordSequence,
    mode: WriteMode,
    sink: &mut dyn EventSink,
) -> Result<Option<WriteReport>> {
    write_sequence(path, sequence, OutputKind::Plain, mode, sink)
}

/// 사전 TLV 파일 쓰기
///
/// 레코드마다 식별자를 담은 Integer 레코드를 먼저 기록하고, 이어서 레코드 자체를 기록합니다.
/// 시퀀스가 비어 있으면 파일을 열지 않고 `None`을 반환합니다.
pub fn write_dictionary(
    path: &Path,
    sequence: &RecordSequence,
    mode: WriteMode,
    sink: &mut dyn EventSink,
) -> Result<Option<WriteReport>> {
    write_sequence(path, sequence, OutputKind::Dictionary, mode, sink)
}

fn write_sequence(
    path: &Path,
    sequence: &RecordSequence,
    output: OutputKind,
    mode: WriteMode,
    sink: &mut dyn EventSink,
) -> Result<Option<WriteReport>> {
    if sequence.is_empty() {
        return Ok(None);
    }

    let file = open_output(path, mode).map_err(|e| report_failure(sink, Site::OpenOutput, e))?;
    let mut encoder = TlvEncoder::new(BufWriter::new(file));
    encode_sequence(&mut encoder, sequence, path, output, sink)?;

    let report = WriteReport {
        output,
        path: path.to_path_buf(),
        records: sequence.len(),
        bytes: encoder.bytes_written(),
    };
    sink.emit(Event::OutputCompleted {
        output,
        path: report.path.clone(),
        records: report.records,
        bytes: report.bytes,
    });

    Ok(Some(report))
}

/// 시퀀스 전체를 인코딩하고 플러시
///
/// 첫 실패에서 멈추며 나머지 레코드는 시도하지 않습니다.
fn encode_sequence<W: Write>(
    encoder: &mut TlvEncoder<W>,
    sequence: &RecordSequence,
    path: &Path,
    output: OutputKind,
    sink: &mut dyn EventSink,
) -> Result<()> {
    for record in sequence {
        if output == OutputKind::Dictionary {
            let index = record.index_record();
            persist(encoder, &index, path, output, sink)?;
        }
        persist(encoder, record, path, output, sink)?;
    }

    encoder
        .flush()
        .map_err(|e| report_failure(sink, Site::FlushOutput, JtlvError::io(path, e)))
}

fn persist<W: Write>(
    encoder: &mut TlvEncoder<W>,
    record: &FieldRecord,
    path: &Path,
    output: OutputKind,
    sink: &mut dyn EventSink,
) -> Result<()> {
    let bytes = encoder
        .encode(record)
        .map_err(|e| report_failure(sink, Site::EncodeRecord, JtlvError::io(path, e)))?;

    sink.emit(Event::RecordPersisted {
        output,
        id: record.id(),
        field_type: record.field_type(),
        bytes,
    });
    Ok(())
}

/// 출력 파일 열기
pub fn open_output(path: &Path, mode: WriteMode) -> Result<File> {
    let file = match mode {
        WriteMode::Overwrite => File::create(path),
        WriteMode::Error => OpenOptions::new().write(true).create_new(true).open(path),
    };

    file.map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => JtlvError::OutputExists {
            path: path.to_path_buf(),
        },
        _ => JtlvError::io(path, e),
    })
}
