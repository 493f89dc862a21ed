//! 레코드 집계 모듈
//!
//! 라인별 필드 레코드 목록을 라인 순서대로 이어 붙인 마스터 시퀀스를 관리합니다.
//! 시퀀스는 `Vec` 아레나이며 레코드는 인덱스로 참조합니다. 번호를 다시 매기지 않습니다.

use std::collections::TryReserveError;
use std::ops::Range;

use crate::record::FieldRecord;

/// 마스터 시퀀스
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordSequence {
    records: Vec<FieldRecord>,
}

impl RecordSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[FieldRecord] {
        &self.records
    }

    /// 한 라인의 레코드 목록을 끝에 이어 붙임
    ///
    /// # Returns
    /// 추가된 레코드들의 인덱스 범위
    pub fn append(
        &mut self,
        mut records: Vec<FieldRecord>,
    ) -> std::result::Result<Range<usize>, TryReserveError> {
        let start = self.records.len();
        self.records.try_reserve(records.len())?;
        self.records.append(&mut records);
        Ok(start..self.records.len())
    }
}

impl<'a> IntoIterator for &'a RecordSequence {
    type Item = &'a FieldRecord;
    type IntoIter = std::slice::Iter<'a, FieldRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// 실행 단위 누적기
///
/// 실행 중 유일하게 변하는 상태(마스터 시퀀스와 라인 카운터)를 담습니다.
#[derive(Debug, Default)]
pub struct Accumulator {
    sequence: RecordSequence,
    lines: usize,
    skipped_lines: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 새 라인을 시작하고 실행 전체 기준 라인 순번(1부터)을 반환
    pub fn begin_line(&mut self) -> usize {
        self.lines += 1;
        self.lines
    }

    /// 레코드 없이 건너뛴 라인 기록
    pub fn skip_line(&mut self) {
        self.skipped_lines += 1;
    }

    /// 라인의 레코드 목록을 시퀀스에 추가 (빈 목록은 아무것도 추가하지 않음)
    pub fn push_line(
        &mut self,
        records: Vec<FieldRecord>,
    ) -> std::result::Result<Range<usize>, TryReserveError> {
        self.sequence.append(records)
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    /// 누적을 끝내고 마스터 시퀀스를 넘겨줌
    pub fn finish(self) -> RecordSequence {
        self.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FieldId, FieldValue};

    fn record(line: usize, local: u32, value: i64) -> FieldRecord {
        FieldRecord::new(FieldId::new(line, local), FieldValue::Integer(value))
    }

    #[test]
    fn test_append_concatenates_in_order() {
        let mut sequence = RecordSequence::new();

        let first = sequence
            .append(vec![record(1, 1, 10), record(1, 2, 20)])
            .unwrap();
        let second = sequence.append(vec![record(2, 1, 30)]).unwrap();

        assert_eq!(first, 0..2);
        assert_eq!(second, 2..3);

        let values: Vec<&FieldValue> = sequence.iter().map(|r| r.value()).collect();
        assert_eq!(
            values,
            vec![
                &FieldValue::Integer(10),
                &FieldValue::Integer(20),
                &FieldValue::Integer(30)
            ]
        );
        assert_eq!(sequence.as_slice()[2].id(), FieldId::new(2, 1));
    }

    #[test]
    fn test_empty_line_contributes_nothing() {
        let mut acc = Accumulator::new();

        acc.begin_line();
        acc.push_line(vec![record(1, 1, 1)]).unwrap();
        acc.begin_line();
        let range = acc.push_line(Vec::new()).unwrap();
        acc.begin_line();
        acc.skip_line();

        assert!(range.is_empty());
        assert_eq!(acc.lines(), 3);
        assert_eq!(acc.skipped_lines(), 1);
        assert_eq!(acc.finish().len(), 1);
    }

    #[test]
    fn test_begin_line_numbers_from_one() {
        let mut acc = Accumulator::new();
        assert_eq!(acc.begin_line(), 1);
        assert_eq!(acc.begin_line(), 2);
        assert!(acc.finish().is_empty());
    }
}
