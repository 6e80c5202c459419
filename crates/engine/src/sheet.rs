// Sheet choice for multi-sheet workbooks. CSV files own one implicit sheet.

/// Name reported for the single sheet of a CSV file.
pub const CSV_SHEET: &str = "CSV";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetChoice {
    pub name: String,
    /// Set when the input was invalid and the first sheet was used instead.
    pub fallback: Option<String>,
}

/// Pick a sheet from operator input: blank = first sheet, 1-based number,
/// or exact name. Anything else falls back to the first sheet with a warning.
///
/// Returns `None` only when `sheet_names` is empty.
pub fn select_sheet(sheet_names: &[String], input: &str) -> Option<SheetChoice> {
    let default = sheet_names.first()?;
    let choice = input.trim();

    let pick = |name: &String| SheetChoice { name: name.clone(), fallback: None };
    let fall_back = |why: String| {
        log::warn!("{why}");
        SheetChoice { name: default.clone(), fallback: Some(why) }
    };

    if choice.is_empty() {
        return Some(pick(default));
    }

    if choice.chars().all(|c| c.is_ascii_digit()) {
        let idx: usize = choice.parse().unwrap_or(0);
        return Some(match idx.checked_sub(1).and_then(|i| sheet_names.get(i)) {
            Some(name) => pick(name),
            None => fall_back(format!("sheet number {choice} is out of range, using '{default}'")),
        });
    }

    Some(match sheet_names.iter().find(|n| n.as_str() == choice) {
        Some(name) => pick(name),
        None => fall_back(format!("no sheet named '{choice}', using '{default}'")),
    })
}
