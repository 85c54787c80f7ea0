//! Roster records.

use super::age::age_on;
use crate::error::AssignError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Gender category of a roster entry.
///
/// Serialized as the literal tokens used by roster exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "männlich", alias = "male")]
    Male,
    #[serde(rename = "weiblich", alias = "female")]
    Female,
}

impl Gender {
    /// Roster token for this category.
    pub fn token(self) -> &'static str {
        match self {
            Gender::Male => "männlich",
            Gender::Female => "weiblich",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Gender {
    type Err = AssignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "männlich" | "male" | "m" => Ok(Gender::Male),
            "weiblich" | "female" | "w" | "f" => Ok(Gender::Female),
            other => Err(AssignError::validation(
                None,
                "gender",
                format!("unknown gender token '{other}'"),
            )),
        }
    }
}

/// One row of a roster.
///
/// `age`, `gender` and `points` are optional because roster rows may come
/// from sources lacking those columns; [`PersonRecord::resolve`] turns a
/// missing value into a validation error. Columns the optimizer does not
/// read travel along in `extra`.
///
/// # Examples
///
/// ```
/// use u_allot::roster::{Gender, PersonRecord};
///
/// let free = PersonRecord::new(0, "Mia", "Keller")
///     .with_age(3)
///     .with_gender(Gender::Female)
///     .with_points(12.0);
/// assert!(free.is_free());
///
/// let fixed = free.clone().with_group("Igel");
/// assert!(!fixed.is_free());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Stable row index.
    pub id: usize,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    /// Age in years; derived from `birth_date` when absent.
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub points: Option<f64>,
    /// Assigned group, `None` while the person is free.
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub modified_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub modified_by: Option<String>,
    /// Any further roster columns, passed through unchanged.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl PersonRecord {
    /// Creates a free record without demographic data.
    pub fn new(id: usize, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            birth_date: None,
            age: None,
            gender: None,
            points: None,
            group: None,
            modified_at: None,
            modified_by: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_birth_date(mut self, birth_date: NaiveDate) -> Self {
        self.birth_date = Some(birth_date);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_points(mut self, points: f64) -> Self {
        self.points = Some(points);
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_extra(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(column.into(), value.into());
        self
    }

    /// Whether the person still needs a group.
    pub fn is_free(&self) -> bool {
        self.group.is_none()
    }

    /// Age from the `age` column, else derived from `birth_date`.
    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        self.age.or_else(|| self.birth_date.map(|b| age_on(b, today)))
    }

    /// Extracts the fields the optimizer needs.
    ///
    /// Fails on the first missing or non-finite field.
    pub fn resolve(&self, today: NaiveDate) -> Result<ResolvedPerson, AssignError> {
        let age = self.age_on(today).ok_or_else(|| {
            AssignError::validation(Some(self.id), "age", "neither age nor birth date given")
        })?;
        let gender = self
            .gender
            .ok_or_else(|| AssignError::validation(Some(self.id), "gender", "missing"))?;
        let points = self
            .points
            .ok_or_else(|| AssignError::validation(Some(self.id), "points", "missing"))?;
        if !points.is_finite() {
            return Err(AssignError::validation(
                Some(self.id),
                "points",
                format!("must be finite, got {points}"),
            ));
        }
        Ok(ResolvedPerson {
            id: self.id,
            age,
            gender,
            points,
            group: self.group.clone(),
        })
    }
}

/// The optimizer's view of a [`PersonRecord`] after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPerson {
    pub id: usize,
    pub age: i32,
    pub gender: Gender,
    pub points: f64,
    pub group: Option<String>,
}

/// Returns a copy of `roster` with `age` filled from `birth_date` where
/// missing.
pub fn derive_ages(roster: &[PersonRecord], today: NaiveDate) -> Vec<PersonRecord> {
    roster
        .iter()
        .map(|record| {
            let mut record = record.clone();
            record.age = record.age_on(today);
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()
    }

    #[test]
    fn test_gender_tokens() {
        assert_eq!("männlich".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("Weiblich".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
        assert!("divers".parse::<Gender>().is_err());
        assert_eq!(Gender::Male.to_string(), "männlich");
    }

    #[test]
    fn test_resolve_complete_record() {
        let record = PersonRecord::new(4, "Ben", "Maier")
            .with_birth_date(NaiveDate::from_ymd_opt(2021, 9, 1).unwrap())
            .with_gender(Gender::Male)
            .with_points(7.5);
        let resolved = record.resolve(today()).unwrap();
        assert_eq!(resolved.id, 4);
        assert_eq!(resolved.age, 2);
        assert_eq!(resolved.gender, Gender::Male);
        assert!(resolved.group.is_none());
    }

    #[test]
    fn test_age_column_wins_over_birth_date() {
        let record = PersonRecord::new(0, "A", "B")
            .with_age(5)
            .with_birth_date(NaiveDate::from_ymd_opt(2021, 9, 1).unwrap());
        assert_eq!(record.age_on(today()), Some(5));
    }

    #[test]
    fn test_resolve_missing_fields() {
        let base = PersonRecord::new(9, "A", "B");
        match base.clone().resolve(today()) {
            Err(AssignError::Validation { record, field, .. }) => {
                assert_eq!(record, Some(9));
                assert_eq!(field, "age");
            }
            other => panic!("unexpected: {other:?}"),
        }

        let no_gender = base.clone().with_age(3).with_points(1.0);
        assert!(matches!(
            no_gender.resolve(today()),
            Err(AssignError::Validation { field: "gender", .. })
        ));

        let no_points = base.clone().with_age(3).with_gender(Gender::Female);
        assert!(matches!(
            no_points.resolve(today()),
            Err(AssignError::Validation { field: "points", .. })
        ));

        let nan_points = base.with_age(3).with_gender(Gender::Female).with_points(f64::NAN);
        assert!(matches!(
            nan_points.resolve(today()),
            Err(AssignError::Validation { field: "points", .. })
        ));
    }

    #[test]
    fn test_derive_ages_returns_copy() {
        let roster = vec![PersonRecord::new(0, "A", "B")
            .with_birth_date(NaiveDate::from_ymd_opt(2020, 8, 2).unwrap())];
        let derived = derive_ages(&roster, today());
        assert_eq!(derived[0].age, Some(3));
        assert_eq!(roster[0].age, None);
    }
}
