//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::flatten::NonScalarPolicy;
use crate::pipeline::ConvertOptions;
use crate::reader::DEFAULT_MAX_LINE_LEN;

/// 출력 파일 모드
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// 기존 파일이 있으면 잘라내고 덮어쓰기
    #[default]
    Overwrite,
    /// 기존 파일이 있으면 에러
    Error,
}

impl std::fmt::Display for WriteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteMode::Overwrite => write!(f, "Overwrite"),
            WriteMode::Error => write!(f, "Error"),
        }
    }
}

/// jtlv CLI 인자 구조체
#[derive(Parser, Debug)]
#[command(
    name = "jtlv",
    author = "YourName <your@email.com>",
    version,
    about = "JSON LINES TO TLV CONVERTER - JSONL 파일의 스칼라 필드를 TLV 바이너리로 변환하는 CLI 도구",
    long_about = r#"
JSON LINES TO TLV CONVERTER
===========================

한 줄에 JSON 객체 하나씩 담긴 파일을 읽어, 각 객체의 최상위 스칼라 멤버
(정수, 실수, 문자열, 불리언)를 TLV 레코드로 변환합니다.

출력:
  • 평문 TLV 파일: 필드마다 tag [length value] 레코드 하나
  • 사전 TLV 파일: 필드마다 (인덱스, 값) 레코드 쌍

필드 번호는 라인마다 1부터 다시 시작합니다.
한 라인이라도 실패하면 어떤 출력 파일도 만들지 않습니다.

예제:
  jtlv
  jtlv -i events.jsonl -o events.tlv -d events.dict
  jtlv -i ./logs --pattern "*.jsonl" --mode error
  jtlv -i data.json --dry-run --json
"#
)]
pub struct Args {
    /// JSON Lines 입력 파일 또는 폴더 경로
    #[arg(short, long, default_value = "data.json")]
    pub input: PathBuf,

    /// 평문 TLV 출력 파일 경로
    #[arg(short, long, default_value = "data.tlv")]
    pub output: PathBuf,

    /// 사전 TLV 출력 파일 경로
    #[arg(short, long, default_value = "data.dict")]
    pub dict_output: PathBuf,

    /// 출력 파일 모드
    #[arg(short, long, value_enum, default_value_t = WriteMode::Overwrite)]
    pub mode: WriteMode,

    /// 폴더 입력 시 파일 이름 패턴 필터 (glob 형식, 예: "*.jsonl")
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// 최대 폴더 탐색 깊이
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// 라인 최대 바이트 수 (개행 제외)
    #[arg(long, default_value_t = DEFAULT_MAX_LINE_LEN)]
    pub max_line_len: usize,

    /// 객체/배열/null 멤버 처리 방식
    #[arg(long, value_enum, default_value_t = NonScalarPolicy::Skip)]
    pub non_scalar: NonScalarPolicy,

    /// 상세 출력 모드 (debug 로그)
    #[arg(short, long)]
    pub verbose: bool,

    /// 파싱과 평탄화만 수행하고 파일은 쓰지 않음
    #[arg(long)]
    pub dry_run: bool,

    /// 로그 파일 경로 (기본값: 표준 에러)
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// 처리 통계를 JSON으로 출력
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// 파이프라인 옵션 생성
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions::new()
            .with_max_line_len(self.max_line_len)
            .with_non_scalar(self.non_scalar)
            .with_write_mode(self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["jtlv"]);

        assert_eq!(args.input, PathBuf::from("data.json"));
        assert_eq!(args.output, PathBuf::from("data.tlv"));
        assert_eq!(args.dict_output, PathBuf::from("data.dict"));
        assert_eq!(args.mode, WriteMode::Overwrite);
        assert_eq!(args.max_line_len, DEFAULT_MAX_LINE_LEN);
        assert_eq!(args.non_scalar, NonScalarPolicy::Skip);
    }

    #[test]
    fn test_convert_options_from_args() {
        let args = Args::parse_from([
            "jtlv",
            "--mode",
            "error",
            "--non-scalar",
            "placeholder",
            "--max-line-len",
            "128",
        ]);
        let options = args.convert_options();

        assert_eq!(options.write_mode, WriteMode::Error);
        assert_eq!(options.non_scalar, NonScalarPolicy::Placeholder);
        assert_eq!(options.max_line_len, 128);
    }
}
