//! Spreadsheet-style column names and A1 cell references.

/// Convert a 0-based column index to spreadsheet column letters
/// (A, B, ..., Z, AA, AB, ..., ZZ, AAA, ...).
///
/// Bijective base 26: there is no "zero" letter, so 26 maps to "AA". Every
/// `usize` gets its own name, `usize::MAX` included.
pub fn column_name(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index;
    loop {
        let offset = u8::try_from(n % 26).unwrap_or(0);
        letters.push(char::from(b'A' + offset));
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// Convert spreadsheet column letters back to a 0-based index.
///
/// Case-insensitive. Returns `None` for an empty string, non-letters or overflow.
pub fn column_index(name: &str) -> Option<usize> {
    let mut col: Option<usize> = None;
    for ch in name.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = usize::try_from(u32::from(ch.to_ascii_uppercase()) - u32::from('A')).ok()?;
        col = Some(match col {
            None => digit,
            Some(prev) => prev.checked_add(1)?.checked_mul(26)?.checked_add(digit)?,
        });
    }
    col
}

/// Parse a cell reference like "B3" (or "$B$3") into `(row, col)`, both 0-indexed.
pub fn parse_cell_ref(cell_ref: &str) -> Option<(usize, usize)> {
    let trimmed: String = cell_ref.trim().chars().filter(|&c| c != '$').collect();
    let split = trimmed.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = trimmed.split_at(split);
    let col = column_index(letters)?;
    let row: usize = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col))
}

/// Parse a cell range like "A1:B10" or "A1" into
/// `(start_row, start_col, end_row, end_col)`, inclusive and normalized.
pub fn parse_cell_range(range: &str) -> Option<(usize, usize, usize, usize)> {
    let ((r1, c1), (r2, c2)) = match range.split_once(':') {
        Some((start, end)) => (parse_cell_ref(start)?, parse_cell_ref(end)?),
        None => {
            let cell = parse_cell_ref(range)?;
            (cell, cell)
        }
    };
    Some((r1.min(r2), c1.min(c2), r1.max(r2), c1.max(c2)))
}
