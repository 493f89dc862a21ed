//! 패턴 매칭 모듈
//!
//! 폴더 입력 시 glob 패턴을 사용한 파일 이름 필터링을 담당합니다.

use glob::Pattern;

use crate::error::{JtlvError, Result};

/// 패턴이 없을 때 허용하는 입력 확장자
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["json", "jsonl"];

/// 컴파일된 패턴 매처
#[derive(Default)]
pub struct PatternMatcher {
    pattern: Option<Pattern>,
}

impl PatternMatcher {
    /// 새 패턴 매처 생성
    ///
    /// # Arguments
    /// * `pattern` - 글로브 패턴 문자열 (None이면 `.json`/`.jsonl` 확장자 매칭)
    ///
    /// # Examples
    /// ```
    /// use jtlv::pattern::PatternMatcher;
    ///
    /// let matcher = PatternMatcher::new(Some("events_*.jsonl".to_string())).unwrap();
    /// assert!(matcher.matches("events_01.jsonl"));
    /// assert!(!matcher.matches("other.jsonl"));
    /// ```
    pub fn new(pattern: Option<String>) -> Result<Self> {
        let compiled = match pattern {
            Some(ref p) => Some(
                Pattern::new(p)
                    .map_err(|_| JtlvError::InvalidPattern { pattern: p.clone() })?,
            ),
            None => None,
        };

        Ok(Self { pattern: compiled })
    }

    /// 파일 이름이 패턴과 일치하는지 확인
    pub fn matches(&self, file_name: &str) -> bool {
        match &self.pattern {
            Some(p) => p.matches(file_name),
            None => file_name
                .rsplit_once('.')
                .map(|(_, ext)| {
                    DEFAULT_EXTENSIONS
                        .iter()
                        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
                })
                .unwrap_or(false),
        }
    }

    /// 패턴이 설정되어 있는지 확인
    pub fn has_pattern(&self) -> bool {
        self.pattern.is_some()
    }
}
