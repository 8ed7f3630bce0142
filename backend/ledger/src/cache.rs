use std::{
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
};

use serde::Serialize;
use tracing::debug;

use crate::record::{DispatchRecord, FileClass, Row};

/// Where historical register rows come from.
pub trait RowSource {
    type Error;

    fn get_rows(&self, range: &str) -> impl Future<Output = Result<Vec<Row>, Self::Error>> + Send;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NextNumbers {
    #[serde(rename = "letters")]
    pub next_letter: u64,
    #[serde(rename = "others")]
    pub next_other: u64,
}

/// Next dispatch number per file class.
///
/// Shared between requests without locking. Each field is updated atomically, the pair is not,
/// so a snapshot taken during a concurrent update may mix old and new values.
#[derive(Debug, Default)]
pub struct DispatchNumbers {
    next_letter: AtomicU64,
    next_other: AtomicU64,
}

impl DispatchNumbers {
    pub fn new() -> Self {
        Self::default()
    }

    fn field(&self, class: FileClass) -> &AtomicU64 {
        match class {
            FileClass::Letter => &self.next_letter,
            FileClass::Other => &self.next_other,
        }
    }

    /// Raises each field to one past the highest number found in `rows`.
    ///
    /// First row is the header. Rows missing a dispatch number or file type, or whose number
    /// does not parse, are skipped. Never lowers a field.
    pub fn rescan(&self, rows: &[Row]) {
        let mut found = NextNumbers::default();
        let mut skipped = 0usize;

        for row in rows.iter().skip(1) {
            let Some(record) = DispatchRecord::from_row(row) else {
                skipped += 1;
                continue;
            };

            let Some(number) = record.number() else {
                skipped += 1;
                continue;
            };

            let candidate = number.saturating_add(1);
            match record.class() {
                FileClass::Letter => found.next_letter = found.next_letter.max(candidate),
                FileClass::Other => found.next_other = found.next_other.max(candidate),
            }
        }

        self.next_letter.fetch_max(found.next_letter, Ordering::Relaxed);
        self.next_other.fetch_max(found.next_other, Ordering::Relaxed);

        debug!(
            rows = rows.len().saturating_sub(1),
            skipped, "Rescanned dispatch numbers"
        );
    }

    /// Overwrites the field for `file_type` with one past `dispatch_number`, if it parses.
    pub fn advance(&self, file_type: &str, dispatch_number: &str) {
        let class = FileClass::classify(file_type);

        match class.parse_number(dispatch_number) {
            Some(number) => self
                .field(class)
                .store(number.saturating_add(1), Ordering::Relaxed),
            None => debug!("Dispatch number {dispatch_number:?} not derivable, cache unchanged"),
        }
    }

    pub fn set_next(&self, file_type: &str, observed_total: u64) {
        self.field(FileClass::classify(file_type))
            .store(observed_total.saturating_add(1), Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> NextNumbers {
        NextNumbers {
            next_letter: self.next_letter.load(Ordering::Relaxed),
            next_other: self.next_other.load(Ordering::Relaxed),
        }
    }

    /// Reads `range` from `source` and rescans it.
    ///
    /// On a source failure the cache is left as it was and the error is handed back.
    pub async fn refresh<S>(&self, source: &S, range: &str) -> Result<NextNumbers, S::Error>
    where
        S: RowSource,
    {
        let rows = source.get_rows(range).await?;
        self.rescan(&rows);

        Ok(self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::{DispatchNumbers, NextNumbers, Row, RowSource};

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn header() -> Row {
        row(&["Dispatch No", "Date", "Subject", "File Type"])
    }

    struct FixedRows(Vec<Row>);

    impl RowSource for FixedRows {
        type Error = String;

        async fn get_rows(&self, _range: &str) -> Result<Vec<Row>, String> {
            Ok(self.0.clone())
        }
    }

    struct Unreachable;

    impl RowSource for Unreachable {
        type Error = String;

        async fn get_rows(&self, range: &str) -> Result<Vec<Row>, String> {
            Err(format!("cannot read {range}"))
        }
    }

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(DispatchNumbers::new().snapshot(), NextNumbers::default());
    }

    #[test]
    fn test_rescan_takes_max() {
        let numbers = DispatchNumbers::new();
        numbers.rescan(&[
            header(),
            row(&["X/1-5", "", "", "Letter"]),
            row(&["X/1-9", "", "", "Letter"]),
            row(&["X/1-7", "", "", "Letter"]),
        ]);

        assert_eq!(numbers.snapshot().next_letter, 10);
        assert_eq!(numbers.snapshot().next_other, 0);
    }

    #[test]
    fn test_rescan_splits_classes() {
        let numbers = DispatchNumbers::new();
        numbers.rescan(&[
            header(),
            row(&["No.BHCP/2024/CAT/12-034", "", "", "Letter"]),
            row(&["No.BHCP/CAT/2024/057", "", "", "Circular"]),
            row(&["No.BHCP/CAT/2024/041", "", "", "Notice"]),
        ]);

        assert_eq!(
            numbers.snapshot(),
            NextNumbers {
                next_letter: 35,
                next_other: 58,
            }
        );
    }

    #[test]
    fn test_rescan_skips_header() {
        let numbers = DispatchNumbers::new();
        numbers.rescan(&[row(&["X/1-50", "", "", "Letter"]), row(&["X/1-3", "", "", "Letter"])]);

        assert_eq!(numbers.snapshot().next_letter, 4);
    }

    #[test]
    fn test_rescan_skips_bad_rows() {
        let numbers = DispatchNumbers::new();
        numbers.rescan(&[
            header(),
            row(&["X/1-5"]),
            row(&["X/1-80", "", "", ""]),
            row(&["", "", "", "Letter"]),
            row(&["not-a-number", "", "", "Letter"]),
            row(&["X/12", "", "", "Letter"]),
            row(&["X/1-2", "", "", "Letter"]),
        ]);

        assert_eq!(numbers.snapshot().next_letter, 3);
        assert_eq!(numbers.snapshot().next_other, 0);
    }

    #[test]
    fn test_rescan_never_lowers() {
        let numbers = DispatchNumbers::new();
        numbers.set_next("Letter", 19);
        numbers.rescan(&[header(), row(&["X/1-5", "", "", "Letter"])]);

        assert_eq!(numbers.snapshot().next_letter, 20);
    }

    #[test]
    fn test_rescan_idempotent() {
        let rows = vec![
            header(),
            row(&["X/1-5", "", "", "Letter"]),
            row(&["X/2024/011", "", "", "Memo"]),
        ];
        let numbers = DispatchNumbers::new();

        numbers.rescan(&rows);
        let first = numbers.snapshot();
        numbers.rescan(&rows);

        assert_eq!(first, numbers.snapshot());
    }

    #[test]
    fn test_advance_overwrites() {
        let numbers = DispatchNumbers::new();
        numbers.set_next("Letter", 499);
        numbers.advance("Letter", "X/1-99");

        assert_eq!(numbers.snapshot().next_letter, 100);
    }

    #[test]
    fn test_advance_other() {
        let numbers = DispatchNumbers::new();
        numbers.advance("Circular", "No.BHCP/CAT/2024/057");

        assert_eq!(numbers.snapshot().next_other, 58);
        assert_eq!(numbers.snapshot().next_letter, 0);
    }

    #[test]
    fn test_advance_unparsable() {
        let numbers = DispatchNumbers::new();
        numbers.set_next("Letter", 9);
        numbers.advance("Letter", "No.BHCP/CAT/2024/057");
        numbers.advance("Memo", "no digits");

        assert_eq!(
            numbers.snapshot(),
            NextNumbers {
                next_letter: 10,
                next_other: 0,
            }
        );
    }

    #[test]
    fn test_set_next() {
        let numbers = DispatchNumbers::new();
        numbers.set_next("other", 41);
        assert_eq!(numbers.snapshot().next_other, 42);

        numbers.set_next("other", 3);
        assert_eq!(numbers.snapshot().next_other, 4);

        numbers.set_next("other", u64::MAX);
        assert_eq!(numbers.snapshot().next_other, u64::MAX);
    }

    #[test]
    fn test_snapshot_json() {
        let numbers = NextNumbers {
            next_letter: 35,
            next_other: 58,
        };

        assert_eq!(
            serde_json::to_value(numbers).unwrap(),
            serde_json::json!({ "letters": 35, "others": 58 })
        );
    }

    #[tokio::test]
    async fn test_refresh() {
        let numbers = DispatchNumbers::new();
        let source = FixedRows(vec![header(), row(&["X/1-9", "", "", "Letter"])]);

        let snapshot = numbers.refresh(&source, "Sheet1!A:D").await.unwrap();

        assert_eq!(snapshot.next_letter, 10);
        assert_eq!(numbers.snapshot(), snapshot);
    }

    #[tokio::test]
    async fn test_refresh_unreachable() {
        let numbers = DispatchNumbers::new();
        numbers.set_next("Letter", 6);
        numbers.set_next("Memo", 2);
        let before = numbers.snapshot();

        let err = numbers.refresh(&Unreachable, "Sheet1!A:D").await.unwrap_err();

        assert_eq!(err, "cannot read Sheet1!A:D");
        assert_eq!(numbers.snapshot(), before);
    }
}
