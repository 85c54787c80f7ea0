//! Summaries of an assignment for display.
//!
//! Everything here reads plain rosters, so a report can be built for any
//! pair of rosters, not only the input and output of one run.

use crate::roster::{Gender, GroupDefinition, PersonRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Sum of points over records that have a group.
///
/// Records without points count as zero.
pub fn total_points(roster: &[PersonRecord]) -> f64 {
    roster
        .iter()
        .filter(|r| r.group.is_some())
        .filter_map(|r| r.points)
        .sum()
}

/// Member counts of one age within a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBucket {
    pub age: i32,
    pub existing_male: usize,
    pub existing_female: usize,
    pub new_male: usize,
    pub new_female: usize,
}

impl AgeBucket {
    pub fn total(&self) -> usize {
        self.existing_male + self.existing_female + self.new_male + self.new_female
    }
}

/// Age and gender distribution of one group after a run, split into
/// members who were already there and members the run added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDistribution {
    pub group: String,
    /// One bucket per age present in the group, ascending.
    pub buckets: Vec<AgeBucket>,
    /// Members lacking an age or a gender, left out of `buckets`.
    pub incomplete: usize,
}

impl GroupDistribution {
    /// Builds the distribution of `group` in `after`.
    ///
    /// A member is *existing* if the record with the same id was already in
    /// `group` in `before`, and *new* otherwise.
    pub fn from_rosters(group: &str, before: &[PersonRecord], after: &[PersonRecord]) -> Self {
        let existing: HashSet<usize> = before
            .iter()
            .filter(|r| r.group.as_deref() == Some(group))
            .map(|r| r.id)
            .collect();

        let mut buckets: BTreeMap<i32, AgeBucket> = BTreeMap::new();
        let mut incomplete = 0;
        for record in after.iter().filter(|r| r.group.as_deref() == Some(group)) {
            let (Some(age), Some(gender)) = (record.age, record.gender) else {
                incomplete += 1;
                continue;
            };
            let bucket = buckets.entry(age).or_insert_with(|| AgeBucket {
                age,
                ..AgeBucket::default()
            });
            let slot = match (existing.contains(&record.id), gender) {
                (true, Gender::Male) => &mut bucket.existing_male,
                (true, Gender::Female) => &mut bucket.existing_female,
                (false, Gender::Male) => &mut bucket.new_male,
                (false, Gender::Female) => &mut bucket.new_female,
            };
            *slot += 1;
        }

        Self {
            group: group.to_string(),
            buckets: buckets.into_values().collect(),
            incomplete,
        }
    }

    /// Members counted in `buckets`.
    pub fn member_count(&self) -> usize {
        self.buckets.iter().map(AgeBucket::total).sum()
    }

    /// Members added by the run.
    pub fn new_count(&self) -> usize {
        self.buckets.iter().map(|b| b.new_male + b.new_female).sum()
    }
}

/// Occupancy of one configured group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOccupancy {
    pub group: String,
    pub occupied: usize,
    pub capacity: u32,
}

impl GroupOccupancy {
    /// Seats left, negative when over capacity.
    pub fn remaining(&self) -> i64 {
        i64::from(self.capacity) - self.occupied as i64
    }

    pub fn is_over_capacity(&self) -> bool {
        self.remaining() < 0
    }
}

/// Occupancy per configured group, in configuration order.
///
/// Records in groups that are not configured are ignored.
pub fn occupancy(roster: &[PersonRecord], groups: &[GroupDefinition]) -> Vec<GroupOccupancy> {
    groups
        .iter()
        .map(|g| GroupOccupancy {
            group: g.name.clone(),
            occupied: roster
                .iter()
                .filter(|r| r.group.as_deref() == Some(g.name.as_str()))
                .count(),
            capacity: g.capacity,
        })
        .collect()
}
