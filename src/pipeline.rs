//! 변환 파이프라인 모듈
//!
//! 입력 전체를 읽고 평탄화하여 마스터 시퀀스를 만든 뒤, 평문 파일과 사전 파일을 차례로 기록합니다.
//! 어느 단계든 실패하면 그때까지 만든 레코드를 모두 버리고 즉시 중단합니다.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::WriteMode;
use crate::error::{JtlvError, Result};
use crate::events::{report_failure, Event, EventSink, Site};
use crate::flatten::{is_blank, parse_object, Flattener, NonScalarPolicy};
use crate::reader::{LineReader, DEFAULT_MAX_LINE_LEN, DEFAULT_MMAP_THRESHOLD};
use crate::record::FIRST_FIELD_ID;
use crate::sequence::{Accumulator, RecordSequence};
use crate::writer::{write_dictionary, write_plain, WriteReport};

/// 변환 옵션
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// 라인 최대 바이트 수 (개행 제외)
    pub max_line_len: usize,
    /// 대용량 파일 임계값 (이상이면 메모리 매핑 사용)
    pub mmap_threshold: u64,
    /// 객체/배열/null 멤버 처리 방식
    pub non_scalar: NonScalarPolicy,
    /// 출력 파일 모드
    pub write_mode: WriteMode,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ConvertOptions {
    /// 기본 옵션 생성
    pub fn new() -> Self {
        Self {
            max_line_len: DEFAULT_MAX_LINE_LEN,
            mmap_threshold: DEFAULT_MMAP_THRESHOLD,
            non_scalar: NonScalarPolicy::Skip,
            write_mode: WriteMode::Overwrite,
        }
    }

    pub fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len;
        self
    }

    pub fn with_mmap_threshold(mut self, mmap_threshold: u64) -> Self {
        self.mmap_threshold = mmap_threshold;
        self
    }

    pub fn with_non_scalar(mut self, non_scalar: NonScalarPolicy) -> Self {
        self.non_scalar = non_scalar;
        self
    }

    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }
}

/// 입력 읽기 결과
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub files: usize,
    pub lines: usize,
    pub skipped_lines: usize,
    pub bytes_read: u64,
}

/// 전체 변환 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertReport {
    pub load: LoadReport,
    pub records: usize,
    /// 레코드가 없으면 `None` (파일을 만들지 않음)
    pub plain: Option<WriteReport>,
    pub dictionary: Option<WriteReport>,
}

/// 입력 파일들을 읽어 마스터 시퀀스 생성
///
/// 파일은 주어진 순서대로 하나의 라인 스트림으로 처리됩니다.
pub fn load_records(
    inputs: &[PathBuf],
    options: &ConvertOptions,
    sink: &mut dyn EventSink,
) -> Result<(RecordSequence, LoadReport)> {
    let flattener = Flattener::new(options.non_scalar);
    let mut acc = Accumulator::new();
    let mut bytes_read = 0;

    for path in inputs {
        let mut reader = LineReader::open(path, options.max_line_len, options.mmap_threshold)
            .map_err(|e| report_failure(sink, Site::OpenInput, e))?;
        sink.emit(Event::InputOpened {
            path: path.clone(),
            bytes: reader.file_size(),
        });

        loop {
            let line = match reader.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => return Err(report_failure(sink, Site::ReadLine, e)),
            };

            let ordinal = acc.begin_line();
            sink.emit(Event::LineStarted {
                line: ordinal,
                bytes: line.bytes.len(),
            });

            if is_blank(line.bytes) {
                acc.skip_line();
                sink.emit(Event::LineSkipped { line: ordinal });
                continue;
            }

            let object = parse_object(path, line.number, line.bytes)
                .map_err(|e| report_failure(sink, Site::ParseLine, e))?;
            let records = flattener
                .flatten(&object, ordinal, FIRST_FIELD_ID, sink)
                .map_err(|e| report_failure(sink, Site::Flatten, e))?;

            acc.push_line(records).map_err(|e| {
                let error = JtlvError::AllocationFailure {
                    line: ordinal,
                    reason: e.to_string(),
                };
                report_failure(sink, Site::Aggregate, error)
            })?;
        }

        bytes_read += reader.bytes_read();
    }

    let report = LoadReport {
        files: inputs.len(),
        lines: acc.lines(),
        skipped_lines: acc.skipped_lines(),
        bytes_read,
    };

    Ok((acc.finish(), report))
}

/// 입력 전체를 변환하여 평문 파일과 사전 파일 기록
///
/// # Arguments
/// * `inputs` - 입력 파일 목록 (처리 순서)
/// * `plain_path` - 평문 TLV 출력 경로
/// * `dict_path` - 사전 TLV 출력 경로
/// * `options` - 변환 옵션
/// * `sink` - 이벤트 수신자
pub fn convert(
    inputs: &[PathBuf],
    plain_path: &Path,
    dict_path: &Path,
    options: &ConvertOptions,
    sink: &mut dyn EventSink,
) -> Result<ConvertReport> {
    check_output_mode(&[plain_path, dict_path], options.write_mode)
        .map_err(|e| report_failure(sink, Site::OpenOutput, e))?;

    let (sequence, load) = load_records(inputs, options, sink)?;

    let plain = write_plain(plain_path, &sequence, options.write_mode, sink)?;
    let dictionary = write_dictionary(dict_path, &sequence, options.write_mode, sink)?;

    Ok(ConvertReport {
        load,
        records: sequence.len(),
        plain,
        dictionary,
    })
}

/// Error 모드에서 출력 파일이 이미 있으면 입력을 읽기 전에 실패
fn check_output_mode(outputs: &[&Path], mode: WriteMode) -> Result<()> {
    if mode != WriteMode::Error {
        return Ok(());
    }

    match outputs.iter().find(|path| path.exists()) {
        Some(path) => Err(JtlvError::OutputExists {
            path: path.to_path_buf(),
        }),
        None => Ok(()),
    }
}
