//! 에러 타입 정의 모듈
//!
//! jtlv에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! 모든 에러는 실행 전체를 중단시키며, 라인 단위로 건너뛰는 복구 경로는 없습니다.

use std::path::PathBuf;
use thiserror::Error;

/// jtlv에서 발생할 수 있는 에러 타입
#[derive(Error, Debug)]
pub enum JtlvError {
    /// 입력 파일을 열거나 읽을 수 없음, 또는 출력 파일을 열거나 쓸 수 없음
    #[error("파일 입출력 실패 ({path}): {source}")]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 라인 종결자를 만나기 전에 최대 라인 길이를 초과함
    #[error("라인이 너무 깁니다 ({path}:{line}): 최대 {limit} 바이트")]
    LineTooLong {
        path: PathBuf,
        line: usize,
        limit: usize,
    },

    /// 유효한 JSON이 아니거나 최상위 값이 객체가 아님
    #[error("JSON 파싱 실패 ({path}:{line}): {reason}")]
    ParseFailure {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// 필드 레코드 생성 중 메모리 할당 실패
    #[error("메모리 할당 실패 (라인 {line}): {reason}")]
    AllocationFailure { line: usize, reason: String },

    /// 출력 파일이 이미 존재 (Error 모드에서)
    #[error("출력 파일이 이미 존재합니다: {path}")]
    OutputExists { path: PathBuf },

    /// 유효하지 않은 패턴
    #[error("유효하지 않은 패턴: {pattern}")]
    InvalidPattern { pattern: String },

    /// 처리할 입력 파일 없음
    #[error("처리할 입력 파일이 없습니다")]
    NoInputFiles,
}

impl JtlvError {
    /// 입출력 에러를 경로와 함께 감싸기
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        JtlvError::IoFailure {
            path: path.into(),
            source,
        }
    }
}

/// jtlv 결과 타입 별칭
pub type Result<T> = std::result::Result<T, JtlvError>;
