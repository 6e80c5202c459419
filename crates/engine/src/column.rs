// Column references typed by the operator: name, 1-based number, or letter.

use crate::error::EngineError;
use crate::table::Table;

/// Raw reference as typed. Resolution is always tried in this order:
/// exact name, 1-based index, single-letter address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef(String);

impl ColumnRef {
    pub fn parse(input: &str) -> Result<Self, EngineError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(EngineError::EmptyReference);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve against a header, returning the zero-based column index.
    pub fn resolve_index(&self, columns: &[String]) -> Result<usize, EngineError> {
        let key = self.0.as_str();

        if let Some(i) = columns.iter().position(|c| c == key) {
            log::debug!("column '{}' matched by name", key);
            return Ok(i);
        }

        if key.chars().all(|c| c.is_ascii_digit()) {
            let n: usize = key.parse().unwrap_or(0);
            if n >= 1 && n <= columns.len() {
                log::debug!("column '{}' matched by position", key);
                return Ok(n - 1);
            }
            return Err(EngineError::OutOfRange {
                reference: key.to_string(),
                first: "1".to_string(),
                last: columns.len().to_string(),
                available: columns.to_vec(),
            });
        }

        let mut chars = key.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_alphabetic() {
                let idx = (c.to_ascii_uppercase() as u8 - b'A') as usize;
                if idx < columns.len() {
                    log::debug!("column '{}' matched by letter", key);
                    return Ok(idx);
                }
                return Err(EngineError::OutOfRange {
                    reference: key.to_string(),
                    first: "A".to_string(),
                    last: columns.len().checked_sub(1).map(col_to_letter).unwrap_or_default(),
                    available: columns.to_vec(),
                });
            }
        }

        Err(EngineError::UnknownColumn {
            reference: key.to_string(),
            available: columns.to_vec(),
        })
    }

    /// Resolve against a table, returning the column name.
    pub fn resolve(&self, table: &Table) -> Result<String, EngineError> {
        let idx = self.resolve_index(table.columns())?;
        Ok(table.columns()[idx].clone())
    }
}

/// Resolve a comma-separated list of references, in order, without repeats.
pub fn resolve_list(input: &str, table: &Table) -> Result<Vec<String>, EngineError> {
    let mut resolved: Vec<String> = Vec::new();
    for part in input.split(',') {
        let name = ColumnRef::parse(part)?.resolve(table)?;
        if resolved.contains(&name) {
            return Err(EngineError::DuplicateColumn(name));
        }
        resolved.push(name);
    }
    Ok(resolved)
}

/// Convert column index to letter (0 -> A, 1 -> B, 26 -> AA, etc.)
pub fn col_to_letter(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(names: &[&str]) -> Table {
        Table::empty(names.iter().map(|s| s.to_string()).collect())
    }

    fn resolve(t: &Table, r: &str) -> Result<String, EngineError> {
        ColumnRef::parse(r)?.resolve(t)
    }

    #[test]
    fn test_name_position_letter_agree() {
        let t = table(&["id", "email", "phone"]);
        assert_eq!(resolve(&t, "email").unwrap(), "email");
        assert_eq!(resolve(&t, "2").unwrap(), "email");
        assert_eq!(resolve(&t, "B").unwrap(), "email");
        assert_eq!(resolve(&t, "b").unwrap(), "email");
    }

    #[test]
    fn test_name_wins_over_position() {
        // A header literally named "1" shadows positional lookup
        let t = table(&["x", "1"]);
        assert_eq!(resolve(&t, "1").unwrap(), "1");
        // A header named "A" shadows the letter address
        let t = table(&["x", "A"]);
        assert_eq!(resolve(&t, "A").unwrap(), "A");
    }

    #[test]
    fn test_out_of_range() {
        let t = table(&["a", "b"]);
        match resolve(&t, "3").unwrap_err() {
            EngineError::OutOfRange { first, last, .. } => {
                assert_eq!((first.as_str(), last.as_str()), ("1", "2"));
            }
            other => panic!("unexpected: {other:?}"),
        }
        match resolve(&t, "C").unwrap_err() {
            EngineError::OutOfRange { last, .. } => assert_eq!(last, "B"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(resolve(&t, "0"), Err(EngineError::OutOfRange { .. })));
    }

    #[test]
    fn test_unknown_lists_available() {
        let t = table(&["a", "b"]);
        let err = resolve(&t, "email").unwrap_err();
        assert_eq!(err.available_columns(), Some(&["a".to_string(), "b".to_string()][..]));
    }

    #[test]
    fn test_empty_reference() {
        assert_eq!(ColumnRef::parse("  "), Err(EngineError::EmptyReference));
    }

    #[test]
    fn test_resolve_list() {
        let t = table(&["id", "email", "phone"]);
        assert_eq!(resolve_list("phone, 1", &t).unwrap(), vec!["phone", "id"]);
        assert_eq!(
            resolve_list("id,A", &t),
            Err(EngineError::DuplicateColumn("id".to_string()))
        );
    }

    #[test]
    fn test_col_to_letter() {
        assert_eq!(col_to_letter(0), "A");
        assert_eq!(col_to_letter(25), "Z");
        assert_eq!(col_to_letter(26), "AA");
        assert_eq!(col_to_letter(701), "ZZ");
    }
}
