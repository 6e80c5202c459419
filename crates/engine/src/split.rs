// Split one table into numbered parts.
//
// Row numbers are 1-based as the operator sees them; `end` is exclusive.
// Internally everything is converted to zero-based half-open ranges.

use std::ops::Range;

use crate::error::EngineError;
use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitPlan {
    /// Consecutive chunks of `chunk_size` rows over `[start, end)`. The last
    /// chunk may be shorter. `max_chunks` stops early after that many parts.
    Chunks {
        start: usize,
        end: usize,
        chunk_size: usize,
        max_chunks: Option<usize>,
    },
    /// `segments` equal parts over `[start, end)`. Length is
    /// `(end - start) / segments`; remainder rows are not written.
    Segments { start: usize, end: usize, segments: usize },
}

/// Check 1-based bounds and return the zero-based half-open range.
pub fn validate_range(start: usize, end: usize, total: usize) -> Result<Range<usize>, EngineError> {
    if start < 1 || start > total {
        return Err(EngineError::StartOutOfRange { start, total });
    }
    if end <= start || end > total + 1 {
        return Err(EngineError::EndOutOfRange { start, end, limit: total + 1 });
    }
    Ok(start - 1..end - 1)
}

/// Zero-based row ranges for each part, in part order.
pub fn plan_ranges(plan: &SplitPlan, total: usize) -> Result<Vec<Range<usize>>, EngineError> {
    match *plan {
        SplitPlan::Chunks { start, end, chunk_size, max_chunks } => {
            let range = validate_range(start, end, total)?;
            if chunk_size == 0 {
                return Err(EngineError::NotPositive { what: "chunk size" });
            }
            if max_chunks == Some(0) {
                return Err(EngineError::NotPositive { what: "number of chunks" });
            }

            let limit = max_chunks.unwrap_or(usize::MAX);
            let ranges = range
                .clone()
                .step_by(chunk_size)
                .take(limit)
                .map(|s| s..s.saturating_add(chunk_size).min(range.end))
                .collect();
            Ok(ranges)
        }
        SplitPlan::Segments { start, end, segments } => {
            let range = validate_range(start, end, total)?;
            if segments == 0 {
                return Err(EngineError::NotPositive { what: "number of segments" });
            }

            let rows = range.len();
            let length = rows / segments;
            if length == 0 {
                return Err(EngineError::SegmentsTooMany { segments, rows });
            }
            let dropped = rows - length * segments;
            if dropped > 0 {
                log::warn!("{} trailing rows do not fill a segment and are not written", dropped);
            }

            Ok((0..segments)
                .map(|i| {
                    let s = range.start + i * length;
                    s..s + length
                })
                .collect())
        }
    }
}

/// Slice `table` into parts according to `plan`.
pub fn split(table: &Table, plan: &SplitPlan) -> Result<Vec<Table>, EngineError> {
    let ranges = plan_ranges(plan, table.row_count())?;
    log::info!("splitting {} rows into {} parts", table.row_count(), ranges.len());
    Ok(ranges.into_iter().map(|r| table.slice(r)).collect())
}

/// `<prefix>_part_<n>.<ext>`, `n` starting at 1.
pub fn part_file_name(prefix: &str, n: usize, ext: &str) -> String {
    format!("{prefix}_part_{n}.{ext}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn numbered(n: usize) -> Table {
        Table::new(
            vec!["n".to_string()],
            (1..=n).map(|i| vec![Cell::Number(i as f64)]).collect(),
        )
        .unwrap()
    }

    fn firsts(parts: &[Table]) -> Vec<String> {
        parts.iter().map(|p| p.rows()[0][0].to_string()).collect()
    }

    #[test]
    fn test_validate_range() {
        assert_eq!(validate_range(1, 11, 10), Ok(0..10));
        assert_eq!(validate_range(3, 5, 10), Ok(2..4));
        assert!(validate_range(0, 5, 10).is_err());
        assert!(validate_range(11, 12, 10).is_err());
        assert!(validate_range(5, 5, 10).is_err());
        assert!(validate_range(5, 12, 10).is_err());
    }

    #[test]
    fn test_chunks_last_is_short() {
        let plan = SplitPlan::Chunks { start: 1, end: 11, chunk_size: 4, max_chunks: None };
        let parts = split(&numbered(10), &plan).unwrap();
        let sizes: Vec<usize> = parts.iter().map(Table::row_count).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert_eq!(firsts(&parts), vec!["1", "5", "9"]);
    }

    #[test]
    fn test_chunks_repeat_limit() {
        let plan = SplitPlan::Chunks { start: 2, end: 11, chunk_size: 3, max_chunks: Some(2) };
        let parts = split(&numbered(10), &plan).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(firsts(&parts), vec!["2", "5"]);
    }

    #[test]
    fn test_chunk_larger_than_range() {
        let plan = SplitPlan::Chunks { start: 2, end: 6, chunk_size: usize::MAX, max_chunks: None };
        let parts = split(&numbered(5), &plan).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].row_count(), 4);
        assert_eq!(firsts(&parts), vec!["2"]);
    }

    #[test]
    fn test_segments_drop_remainder() {
        let plan = SplitPlan::Segments { start: 1, end: 11, segments: 3 };
        let parts = split(&numbered(10), &plan).unwrap();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.row_count() == 3));
        let last = parts[2].rows().last().unwrap()[0].to_string();
        assert_eq!(last, "9", "row 10 is not written");
    }

    #[test]
    fn test_segments_too_many() {
        let plan = SplitPlan::Segments { start: 1, end: 3, segments: 5 };
        assert_eq!(
            plan_ranges(&plan, 10),
            Err(EngineError::SegmentsTooMany { segments: 5, rows: 2 })
        );
    }

    #[test]
    fn test_zero_sizes_rejected() {
        let plan = SplitPlan::Chunks { start: 1, end: 2, chunk_size: 0, max_chunks: None };
        assert!(matches!(plan_ranges(&plan, 5), Err(EngineError::NotPositive { .. })));
    }

    #[test]
    fn test_part_file_name() {
        assert_eq!(part_file_name("orders", 3, "csv"), "orders_part_3.csv");
    }
}
