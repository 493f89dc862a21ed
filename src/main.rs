//! jtlv - JSON LINES TO TLV CONVERTER
//!
//! 메인 엔트리포인트

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use jtlv::{
    cli::Args,
    events::{Event, EventSink, TracingSink},
    input::collect_input_files,
    pattern::PatternMatcher,
    pipeline::{convert, load_records},
    stats::Statistics,
};

fn main() -> Result<()> {
    let args = Args::parse();

    // 로그 초기화
    init_logging(&args)?;

    if !args.json {
        print_header(&args);
    }

    // 입력 파일 수집
    let pattern_matcher = PatternMatcher::new(args.pattern.clone())?;
    let inputs = collect_input_files(&args.input, &pattern_matcher, args.max_depth)?;

    let progress = if args.json {
        ProgressBar::hidden()
    } else {
        create_progress_bar(input_size(&inputs))
    };
    let mut sink = CliSink::new(progress);
    let options = args.convert_options();

    // 드라이런 모드
    if args.dry_run {
        let result = load_records(&inputs, &options, &mut sink);
        let (sequence, _) = sink.finish(result)?;
        if !args.json {
            println!(
                "\n{} {} 개의 필드 레코드가 기록될 예정입니다.",
                "ℹ️".bright_blue(),
                sequence.len().to_string().bright_green()
            );
        }
        return print_summary(&args, &sink.stats);
    }

    // 변환 모드
    let result = convert(&inputs, &args.output, &args.dict_output, &options, &mut sink);
    let report = sink.finish(result)?;

    print_summary(&args, &sink.stats)?;

    if !args.json {
        match (&report.plain, &report.dictionary) {
            (Some(plain), Some(dict)) => println!(
                "\n{} 저장 완료: {:?}, {:?}\n",
                "✅".bright_green(),
                plain.path,
                dict.path
            ),
            _ => println!(
                "\n{} 필드 레코드가 없어 출력 파일을 만들지 않았습니다.\n",
                "⚠️".bright_yellow()
            ),
        }
    }

    Ok(())
}

/// 이벤트를 통계, 진행률, 로그로 나누어 보내는 수신자
struct CliSink {
    stats: Statistics,
    progress: ProgressBar,
    tracing: TracingSink,
}

impl CliSink {
    fn new(progress: ProgressBar) -> Self {
        Self {
            stats: Statistics::new(),
            progress,
            tracing: TracingSink,
        }
    }

    /// 진행률 바를 정리하고 결과를 그대로 넘김
    fn finish<T>(&self, result: jtlv::Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                self.progress.finish_with_message("완료!");
                Ok(value)
            }
            Err(e) => {
                self.progress.abandon_with_message("실패");
                Err(e.into())
            }
        }
    }
}

impl EventSink for CliSink {
    fn emit(&mut self, event: Event) {
        self.stats.record(&event);
        if let Event::LineStarted { bytes, .. } = &event {
            // 개행 포함
            self.progress.inc(*bytes as u64 + 1);
        }
        self.tracing.emit(event);
    }
}

/// 로그 초기화 (기본 warn, --verbose 시 debug, RUST_LOG 우선)
fn init_logging(args: &Args) -> Result<()> {
    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match &args.log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("로그 파일 생성 실패: {:?}", path))?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}

/// 헤더 출력
fn print_header(args: &Args) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!("{}", " 🚀 JSON LINES TO TLV CONVERTER".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());
    println!("  {} 입력: {:?}", "📂".bright_cyan(), args.input);

    if !args.dry_run {
        println!("  {} 평문 TLV: {:?}", "📄".bright_green(), args.output);
        println!("  {} 사전 TLV: {:?}", "📄".bright_green(), args.dict_output);
        println!("  {} 모드: {}", "⚙️".bright_yellow(), args.mode);
    }

    if let Some(ref pattern) = args.pattern {
        println!("  {} 패턴 필터: {}", "🔍".bright_magenta(), pattern);
    }

    println!(
        "  {} 비스칼라 멤버: {}",
        "🎯".bright_cyan(),
        args.non_scalar
    );

    if args.dry_run {
        println!(
            "  {} {}",
            "⚠️".bright_yellow(),
            "드라이런 모드 (파일 쓰기 없음)".yellow()
        );
    }

    println!("{}", "═".repeat(50).bright_blue());
}

/// 통계 출력
fn print_summary(args: &Args, stats: &Statistics) -> Result<()> {
    if args.json {
        let summary = serde_json::to_string_pretty(&stats.summary())?;
        println!("{}", summary);
    } else {
        stats.print_summary();
    }
    Ok(())
}

/// 입력 파일 총 크기
fn input_size(inputs: &[PathBuf]) -> u64 {
    inputs
        .iter()
        .filter_map(|path| std::fs::metadata(path).ok())
        .map(|m| m.len())
        .sum()
}

/// 진행률 바 생성
fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░"),
    );
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use jtlv::record::{FieldId, FieldType};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_input_size() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.jsonl");
        let b = temp_dir.path().join("b.jsonl");
        fs::write(&a, "{\"a\":1}\n").unwrap();
        fs::write(&b, "{}\n").unwrap();

        assert_eq!(input_size(&[a, b]), 8 + 3);
    }

    #[test]
    fn test_cli_sink_tracks_progress_and_stats() {
        let mut sink = CliSink::new(ProgressBar::hidden());

        sink.emit(Event::LineStarted { line: 1, bytes: 7 });
        sink.emit(Event::RecordAllocated {
            id: FieldId::new(1, 1),
            field_type: FieldType::Integer,
        });

        assert_eq!(sink.progress.position(), 8);
        assert_eq!(sink.stats.lines, 1);
        assert_eq!(sink.stats.records, 1);
    }

    #[test]
    fn test_finish_passes_errors_through() {
        let sink = CliSink::new(ProgressBar::hidden());
        let result: jtlv::Result<()> = Err(jtlv::JtlvError::NoInputFiles);

        let err = sink.finish(result).unwrap_err();
        assert!(err.to_string().contains("입력 파일이 없습니다"));
    }
}
