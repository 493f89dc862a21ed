//! 통계 및 유틸리티 모듈
//!
//! 파이프라인 이벤트로부터 처리 통계를 집계하고 포맷팅을 담당합니다.

use colored::Colorize;
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::events::Event;
use crate::writer::OutputKind;

/// 처리 통계 구조체
#[derive(Debug)]
pub struct Statistics {
    /// 입력 파일 수
    pub files: usize,
    /// 읽은 라인 수
    pub lines: usize,
    /// 건너뛴 빈 라인 수
    pub skipped_lines: usize,
    /// 할당된 필드 레코드 수
    pub records: usize,
    /// 입력 파일 총 크기
    pub bytes_read: u64,
    /// 평문 파일에 쓴 바이트
    pub plain_bytes: u64,
    /// 사전 파일에 쓴 바이트
    pub dictionary_bytes: u64,
    /// 실패 이벤트 수
    pub failures: usize,
    /// 처리 시작 시간
    start_time: Instant,
}

/// 직렬화 가능한 통계 스냅샷
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub files: usize,
    pub lines: usize,
    pub skipped_lines: usize,
    pub records: usize,
    pub bytes_read: u64,
    pub plain_bytes: u64,
    pub dictionary_bytes: u64,
    pub failures: usize,
    pub elapsed_ms: u128,
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistics {
    /// 새 통계 인스턴스 생성
    pub fn new() -> Self {
        Self {
            files: 0,
            lines: 0,
            skipped_lines: 0,
            records: 0,
            bytes_read: 0,
            plain_bytes: 0,
            dictionary_bytes: 0,
            failures: 0,
            start_time: Instant::now(),
        }
    }

    /// 이벤트 하나를 통계에 반영
    pub fn record(&mut self, event: &Event) {
        match event {
            Event::InputOpened { bytes, .. } => {
                self.files += 1;
                self.bytes_read += bytes;
            }
            Event::LineStarted { .. } => self.lines += 1,
            Event::LineSkipped { .. } => self.skipped_lines += 1,
            Event::RecordAllocated { .. } => self.records += 1,
            Event::RecordPersisted { output, bytes, .. } => match output {
                OutputKind::Plain => self.plain_bytes += *bytes as u64,
                OutputKind::Dictionary => self.dictionary_bytes += *bytes as u64,
            },
            Event::OutputCompleted { .. } => {}
            Event::Failure { .. } => self.failures += 1,
        }
    }

    /// 경과 시간 반환
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 통계 스냅샷 생성
    pub fn summary(&self) -> Summary {
        Summary {
            files: self.files,
            lines: self.lines,
            skipped_lines: self.skipped_lines,
            records: self.records,
            bytes_read: self.bytes_read,
            plain_bytes: self.plain_bytes,
            dictionary_bytes: self.dictionary_bytes,
            failures: self.failures,
            elapsed_ms: self.elapsed().as_millis(),
        }
    }

    /// 처리 통계 요약 출력
    pub fn print_summary(&self) {
        println!("\n{}", "═".repeat(50).bright_blue());
        println!("{}", " 📊 처리 통계".bright_white().bold());
        println!("{}", "═".repeat(50).bright_blue());

        println!("  {} 입력 파일:    {}", "📁".bright_cyan(), self.files);
        println!(
            "  {} 라인:         {} (빈 라인 {})",
            "📄".bright_cyan(),
            self.lines,
            self.skipped_lines
        );
        println!(
            "  {} 필드 레코드:  {}",
            "🧩".bright_green(),
            self.records.to_string().green()
        );
        println!(
            "  {} 입력 용량:    {}",
            "📥".bright_yellow(),
            format_bytes(self.bytes_read)
        );
        println!(
            "  {} 평문 TLV:     {}",
            "📤".bright_magenta(),
            format_bytes(self.plain_bytes)
        );
        println!(
            "  {} 사전 TLV:     {}",
            "📤".bright_magenta(),
            format_bytes(self.dictionary_bytes)
        );

        if self.failures > 0 {
            println!(
                "  {} 실패:         {}",
                "❌".bright_red(),
                self.failures.to_string().red()
            );
        }

        println!(
            "  {} 처리 시간:    {}",
            "⏱️".bright_cyan(),
            format_duration(self.elapsed())
        );

        println!("{}", "═".repeat(50).bright_blue());
    }
}

/// 바이트를 읽기 쉬운 형식으로 변환
///
/// # Examples
/// ```
/// use jtlv::stats::format_bytes;
///
/// assert_eq!(format_bytes(500), "500 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1048576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// 경과 시간을 읽기 쉬운 형식으로 변환
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs >= 3600 {
        format!("{}시간 {}분", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}분 {}초", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}.{:03}초", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Site;
    use crate::record::{FieldId, FieldType};
    use std::path::PathBuf;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1073741824), "1.00 GB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs(5)), "5.000초");
        assert_eq!(format_duration(Duration::from_secs(65)), "1분 5초");
        assert_eq!(format_duration(Duration::from_secs(3665)), "1시간 1분");
    }

    #[test]
    fn test_statistics_from_events() {
        let mut stats = Statistics::new();
        let id = FieldId::new(1, 1);

        let events = [
            Event::InputOpened {
                path: PathBuf::from("data.json"),
                bytes: 100,
            },
            Event::LineStarted { line: 1, bytes: 8 },
            Event::RecordAllocated {
                id,
                field_type: FieldType::Integer,
            },
            Event::LineStarted { line: 2, bytes: 0 },
            Event::LineSkipped { line: 2 },
            Event::RecordPersisted {
                output: OutputKind::Plain,
                id,
                field_type: FieldType::Integer,
                bytes: 17,
            },
            Event::RecordPersisted {
                output: OutputKind::Dictionary,
                id,
                field_type: FieldType::Integer,
                bytes: 17,
            },
            Event::Failure {
                site: Site::FlushOutput,
                message: "disk full".to_string(),
            },
        ];
        for event in &events {
            stats.record(event);
        }

        let summary = stats.summary();
        assert_eq!(summary.files, 1);
        assert_eq!(summary.lines, 2);
        assert_eq!(summary.skipped_lines, 1);
        assert_eq!(summary.records, 1);
        assert_eq!(summary.bytes_read, 100);
        assert_eq!(summary.plain_bytes, 17);
        assert_eq!(summary.dictionary_bytes, 17);
        assert_eq!(summary.failures, 1);
    }
}
