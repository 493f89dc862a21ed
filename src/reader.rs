//! 라인 읽기 모듈
//!
//! 입력 파일을 개행 단위로 읽습니다. 큰 파일은 메모리 매핑, 그 외에는 버퍼 리더를 사용합니다.

use memmap2::Mmap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

use crate::error::{JtlvError, Result};

/// 기본 라인 최대 길이 (4096 바이트 버퍼에서 개행과 종결자 자리를 뺀 값)
pub const DEFAULT_MAX_LINE_LEN: usize = 4094;

/// 메모리 매핑 기본 임계값
pub const DEFAULT_MMAP_THRESHOLD: u64 = 10 * 1024 * 1024; // 10MB

/// 읽은 라인
#[derive(Debug, PartialEq, Eq)]
pub struct Line<'a> {
    /// 파일 내 라인 번호 (1부터)
    pub number: usize,
    /// 라인 내용 (개행 제외)
    pub bytes: &'a [u8],
}

/// 길이 제한이 있는 라인 리더
pub struct LineReader {
    path: PathBuf,
    reader: Box<dyn BufRead>,
    buf: Vec<u8>,
    max_line_len: usize,
    line_no: usize,
    file_size: u64,
    bytes_read: u64,
}

impl LineReader {
    /// 입력 파일 열기
    ///
    /// # Arguments
    /// * `path` - 입력 파일 경로
    /// * `max_line_len` - 개행을 제외한 라인 최대 바이트 수
    /// * `mmap_threshold` - 이 크기 이상이면 메모리 매핑 사용
    pub fn open(path: &Path, max_line_len: usize, mmap_threshold: u64) -> Result<Self> {
        let file = File::open(path).map_err(|e| JtlvError::io(path, e))?;
        let file_size = file.metadata().map_err(|e| JtlvError::io(path, e))?.len();

        let reader: Box<dyn BufRead> = if file_size > 0 && file_size >= mmap_threshold {
            // 대용량 파일: 메모리 매핑 사용
            let mmap = unsafe { Mmap::map(&file).map_err(|e| JtlvError::io(path, e))? };
            Box::new(Cursor::new(mmap))
        } else {
            Box::new(BufReader::new(file))
        };

        Ok(Self::from_parts(path, reader, max_line_len, file_size))
    }

    /// 임의의 버퍼 리더로부터 생성
    pub fn from_reader(
        path: &Path,
        reader: impl BufRead + 'static,
        max_line_len: usize,
    ) -> Self {
        Self::from_parts(path, Box::new(reader), max_line_len, 0)
    }

    fn from_parts(
        path: &Path,
        reader: Box<dyn BufRead>,
        max_line_len: usize,
        file_size: u64,
    ) -> Self {
        Self {
            path: path.to_path_buf(),
            reader,
            buf: Vec::new(),
            max_line_len,
            line_no: 0,
            file_size,
            bytes_read: 0,
        }
    }

    /// 다음 라인 읽기
    ///
    /// 개행 없이 끝나는 마지막 라인도 반환합니다. 개행 전에 `max_line_len`을 넘으면
    /// [`JtlvError::LineTooLong`]을 반환합니다.
    pub fn next_line(&mut self) -> Result<Option<Line<'_>>> {
        self.buf.clear();

        let limit = self.max_line_len as u64 + 1;
        let read = (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut self.buf)
            .map_err(|e| JtlvError::io(&self.path, e))?;

        if read == 0 {
            return Ok(None);
        }

        self.line_no += 1;
        self.bytes_read += read as u64;

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        } else if self.buf.len() > self.max_line_len {
            return Err(JtlvError::LineTooLong {
                path: self.path.clone(),
                line: self.line_no,
                limit: self.max_line_len,
            });
        }

        Ok(Some(Line {
            number: self.line_no,
            bytes: &self.buf,
        }))
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn reader(content: &'static str, max: usize) -> LineReader {
        LineReader::from_reader(Path::new("mem.json"), Cursor::new(content.as_bytes()), max)
    }

    fn collect(mut reader: LineReader) -> Result<Vec<(usize, String)>> {
        let mut lines = Vec::new();
        while let Some(line) = reader.next_line()? {
            lines.push((
                line.number,
                String::from_utf8_lossy(line.bytes).into_owned(),
            ));
        }
        Ok(lines)
    }

    #[test]
    fn test_reads_lines_and_unterminated_tail() {
        let lines = collect(reader("{\"a\":1}\n\n{\"b\":2}", 64)).unwrap();
        assert_eq!(
            lines,
            vec![
                (1, "{\"a\":1}".to_string()),
                (2, String::new()),
                (3, "{\"b\":2}".to_string())
            ]
        );
    }

    #[test]
    fn test_line_at_limit_is_accepted() {
        let lines = collect(reader("abcd\nabcd", 4)).unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_line_over_limit_fails() {
        let mut r = reader("ab\nabcde\nxy\n", 4);
        assert!(r.next_line().unwrap().is_some());

        let err = r.next_line().unwrap_err();
        assert!(matches!(
            err,
            JtlvError::LineTooLong {
                line: 2,
                limit: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_open_missing_file() {
        let err = LineReader::open(Path::new("/nonexistent/data.json"), 16, u64::MAX)
            .err()
            .unwrap();
        assert!(matches!(err, JtlvError::IoFailure { .. }));
    }

    #[test]
    fn test_mmap_and_buffered_agree() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.json");
        fs::write(&path, "{\"a\":1}\n{\"b\":\"x\"}\n").unwrap();

        let mapped = collect(LineReader::open(&path, 64, 1).unwrap()).unwrap();
        let buffered = collect(LineReader::open(&path, 64, u64::MAX).unwrap()).unwrap();

        assert_eq!(mapped, buffered);
        assert_eq!(mapped.len(), 2);
    }

    #[test]
    fn test_bytes_read_counts_newlines() {
        let mut r = reader("ab\ncd\n", 8);
        while r.next_line().unwrap().is_some() {}
        assert_eq!(r.bytes_read(), 6);
    }
}
