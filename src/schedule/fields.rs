//! Text extraction from individual cells. All functions are total: an absent cell
//! yields an empty string.

/// Class identifier from a student-number cell: whitespace removed, then the second
/// and third characters (`"3 1201"` → `"12"`). Shorter values are returned whole.
pub fn class_code(cell: Option<&str>) -> String {
    let stripped: String = cell
        .unwrap_or_default()
        .chars()
        .filter(|character| !character.is_whitespace())
        .collect();
    if stripped.chars().count() >= 3 {
        stripped.chars().skip(1).take(2).collect()
    } else {
        stripped
    }
}

/// First `n` characters of the trimmed cell.
pub fn truncate_text(cell: Option<&str>, n: usize) -> String {
    cell.unwrap_or_default().trim().chars().take(n).collect()
}

/// Trimmed cell text.
pub fn text(cell: Option<&str>) -> String {
    cell.unwrap_or_default().trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_code_takes_second_and_third_characters() {
        assert_eq!(class_code(Some("31201")), "12");
        assert_eq!(class_code(Some(" 3 1 201 ")), "12");
        assert_eq!(class_code(Some("3학년2반")), "학년");
        assert_eq!(class_code(Some("312")), "12");
    }

    #[test]
    fn short_class_values_are_kept() {
        assert_eq!(class_code(Some("31")), "31");
        assert_eq!(class_code(Some(" ")), "");
        assert_eq!(class_code(None), "");
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_text(Some(" 서울대학교 "), 2), "서울");
        assert_eq!(truncate_text(Some("서울대학교"), 3), "서울대");
        assert_eq!(truncate_text(Some("KU"), 3), "KU");
        assert_eq!(truncate_text(None, 2), "");
    }

    #[test]
    fn text_is_trimmed() {
        assert_eq!(text(Some("  학생부종합(면접)\n")), "학생부종합(면접)");
        assert_eq!(text(None), "");
    }
}
