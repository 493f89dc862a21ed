//! 입력 경로 해석 모듈
//!
//! 입력 경로가 파일이면 그대로, 폴더면 패턴에 맞는 파일들을 이름 순으로 수집합니다.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{JtlvError, Result};
use crate::pattern::PatternMatcher;

/// 처리할 입력 파일 목록 수집
///
/// 폴더 입력은 파일 이름 순으로 정렬되어 매 실행마다 같은 순서를 보장합니다.
///
/// # Arguments
/// * `input` - 입력 파일 또는 폴더
/// * `matcher` - 폴더 입력 시 파일 이름 필터
/// * `max_depth` - 폴더 탐색 최대 깊이
pub fn collect_input_files(
    input: &Path,
    matcher: &PatternMatcher,
    max_depth: Option<usize>,
) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(input).map_err(|e| JtlvError::io(input, e))?;

    if !metadata.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut walker = WalkDir::new(input).sort_by_file_name();
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(input).to_path_buf();
            JtlvError::io(path, e.into())
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let matched = entry
            .file_name()
            .to_str()
            .map(|name| matcher.matches(name))
            .unwrap_or(false);
        if matched {
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        return Err(JtlvError::NoInputFiles);
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "{}\n").unwrap();
    }

    #[test]
    fn test_single_file_passes_through() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "anything.txt");
        let path = temp_dir.path().join("anything.txt");

        let files = collect_input_files(&path, &PatternMatcher::default(), None).unwrap();
        assert_eq!(files, vec![path]);
    }

    #[test]
    fn test_directory_sorted_and_filtered() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "b.jsonl");
        touch(temp_dir.path(), "a.json");
        touch(temp_dir.path(), "c.txt");

        let files = collect_input_files(temp_dir.path(), &PatternMatcher::default(), None).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["a.json", "b.jsonl"]);
    }

    #[test]
    fn test_max_depth() {
        let temp_dir = TempDir::new().unwrap();
        let sub_dir = temp_dir.path().join("sub");
        let deep_dir = sub_dir.join("deep");
        fs::create_dir_all(&deep_dir).unwrap();

        touch(temp_dir.path(), "root.jsonl");
        touch(&sub_dir, "level1.jsonl");
        touch(&deep_dir, "level2.jsonl");

        let files =
            collect_input_files(temp_dir.path(), &PatternMatcher::default(), Some(2)).unwrap();

        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_empty_directory_is_error() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "notes.txt");

        let err = collect_input_files(temp_dir.path(), &PatternMatcher::default(), None)
            .unwrap_err();
        assert!(matches!(err, JtlvError::NoInputFiles));
    }

    #[test]
    fn test_missing_input_is_io_failure() {
        let err = collect_input_files(
            Path::new("/nonexistent/input"),
            &PatternMatcher::default(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, JtlvError::IoFailure { .. }));
    }
}
