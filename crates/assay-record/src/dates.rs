//! Date parsing for record fields and query values.
//!
//! Assay records arrive from many sources (lab instrument exports, manual
//! entry, spreadsheet dumps), so date strings are accepted in several
//! formats and canonicalized to ISO (`YYYY-MM-DD`) on the way into the
//! store. Query values entered against date fields go through the same
//! table, so a query written as `01/31/2020` compares correctly against a
//! stored `2020-01-31`.

use chrono::NaiveDate;

/// Accepted input formats, tried in order. The year-first forms win for
/// ambiguous strings because they are tried first.
const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d", "%Y/%m/%d", "%m-%d-%Y", "%m/%d/%Y", "%Y-%d-%m", "%Y/%d/%m", "%d-%m-%Y", "%d/%m/%Y",
];

/// Canonical on-the-wire date format. ISO dates compare correctly as plain
/// strings, which the store layer relies on.
const ISO_FORMAT: &str = "%Y-%m-%d";

/// Parses a date string against the accepted format table.
///
/// Returns `None` if the string matches none of the formats.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// Renders a date in the canonical ISO form.
pub fn to_iso(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// Parses a date string and re-renders it in canonical ISO form.
pub fn canonicalize(text: &str) -> Option<String> {
    parse_date(text).map(to_iso)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_date() {
        assert_eq!(parse_date("2020-01-31"), NaiveDate::from_ymd_opt(2020, 1, 31));
    }

    #[test]
    fn slash_separated() {
        assert_eq!(parse_date("2020/01/31"), NaiveDate::from_ymd_opt(2020, 1, 31));
    }

    #[test]
    fn us_style() {
        assert_eq!(parse_date("01-31-2020"), NaiveDate::from_ymd_opt(2020, 1, 31));
        assert_eq!(parse_date("01/31/2020"), NaiveDate::from_ymd_opt(2020, 1, 31));
    }

    #[test]
    fn day_first() {
        assert_eq!(parse_date("31-01-2020"), NaiveDate::from_ymd_opt(2020, 1, 31));
    }

    #[test]
    fn year_first_wins_when_ambiguous() {
        // 2020-02-03 could be month-day or day-month; the year-first
        // month-day form is tried first.
        assert_eq!(parse_date("2020-02-03"), NaiveDate::from_ymd_opt(2020, 2, 3));
    }

    #[test]
    fn surrounding_whitespace() {
        assert_eq!(parse_date("  2020-01-31 "), NaiveDate::from_ymd_opt(2020, 1, 31));
    }

    #[test]
    fn garbage_rejected() {
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2020-13-45"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn canonicalize_rewrites_to_iso() {
        assert_eq!(canonicalize("01/31/2020").as_deref(), Some("2020-01-31"));
        assert_eq!(canonicalize("2020-01-31").as_deref(), Some("2020-01-31"));
        assert_eq!(canonicalize("junk"), None);
    }
}
