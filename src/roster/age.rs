//! Calendar age from a birth date.

use crate::error::AssignError;
use chrono::{Datelike, Local, NaiveDate};

/// Text format of birth dates in roster exports (`31.12.2020`).
pub const BIRTH_DATE_FORMAT: &str = "%d.%m.%Y";

/// Age in completed years on `today`.
///
/// Birth dates after `today` yield negative ages, which is how rosters
/// register children who are not born yet.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use u_allot::roster::age_on;
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
/// assert_eq!(age_on(NaiveDate::from_ymd_opt(2020, 6, 15).unwrap(), today), 4);
/// assert_eq!(age_on(NaiveDate::from_ymd_opt(2020, 6, 16).unwrap(), today), 3);
/// assert_eq!(age_on(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), today), -2);
/// ```
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let years = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        years - 1
    } else {
        years
    }
}

/// Age in completed years as of the local calendar date.
pub fn age_today(birth_date: NaiveDate) -> i32 {
    age_on(birth_date, Local::now().date_naive())
}

/// Parses a `dd.mm.yyyy` birth date.
pub fn parse_birth_date(text: &str) -> Result<NaiveDate, AssignError> {
    NaiveDate::parse_from_str(text.trim(), BIRTH_DATE_FORMAT).map_err(|e| {
        AssignError::validation(None, "birth_date", format!("cannot parse '{text}': {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_birthday_boundary() {
        let today = date(2024, 3, 10);
        assert_eq!(age_on(date(2019, 3, 10), today), 5);
        assert_eq!(age_on(date(2019, 3, 11), today), 4);
        assert_eq!(age_on(date(2019, 2, 28), today), 5);
    }

    #[test]
    fn test_prenatal_age() {
        let today = date(2024, 3, 10);
        // Due later this year: not yet born, age -1 until the birthday passes.
        assert_eq!(age_on(date(2024, 9, 1), today), -1);
        assert_eq!(age_on(date(2025, 1, 5), today), -1);
        assert_eq!(age_on(date(2025, 3, 10), today), -1);
        assert_eq!(age_on(date(2025, 3, 11), today), -2);
    }

    #[test]
    fn test_leap_day_birth() {
        assert_eq!(age_on(date(2020, 2, 29), date(2021, 2, 28)), 0);
        assert_eq!(age_on(date(2020, 2, 29), date(2021, 3, 1)), 1);
    }

    #[test]
    fn test_parse_birth_date() {
        assert_eq!(parse_birth_date("04.07.2021").unwrap(), date(2021, 7, 4));
        assert_eq!(parse_birth_date(" 01.01.2000 ").unwrap(), date(2000, 1, 1));
        assert!(parse_birth_date("2021-07-04").is_err());
        assert!(parse_birth_date("31.02.2021").is_err());
    }
}
