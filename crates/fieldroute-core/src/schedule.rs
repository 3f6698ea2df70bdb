//! Weekly visit schedule matrix and the change-set computed when a manager
//! saves an edited matrix.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::weekday::Weekday;

static NO_DAYS: BTreeSet<Weekday> = BTreeSet::new();

/// Store → planned weekdays for a single supervisor.
///
/// A store mapped to an empty set is equivalent to an absent store. Visit
/// order is not part of the matrix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklySchedule {
    stores: BTreeMap<String, BTreeSet<Weekday>>,
}

impl WeeklySchedule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a schedule from `(store, day)` pairs. Duplicates collapse.
    pub fn from_visits<I, S>(visits: I) -> Self
    where
        I: IntoIterator<Item = (S, Weekday)>,
        S: Into<String>,
    {
        let mut schedule = Self::new();
        for (store_id, day) in visits {
            schedule.insert(store_id, day);
        }
        schedule
    }

    /// Adds one planned visit. Returns `false` if it was already present.
    pub fn insert(&mut self, store_id: impl Into<String>, day: Weekday) -> bool {
        self.stores.entry(store_id.into()).or_default().insert(day)
    }

    /// Replaces the days planned for a store. An empty set keeps the store as
    /// a displayed row with nothing checked.
    pub fn set_days<I>(&mut self, store_id: impl Into<String>, days: I)
    where
        I: IntoIterator<Item = Weekday>,
    {
        self.stores
            .insert(store_id.into(), days.into_iter().collect());
    }

    /// Days planned for a store; empty when the store is not scheduled.
    #[must_use]
    pub fn days(&self, store_id: &str) -> &BTreeSet<Weekday> {
        self.stores.get(store_id).unwrap_or(&NO_DAYS)
    }

    #[must_use]
    pub fn contains(&self, store_id: &str, day: Weekday) -> bool {
        self.days(store_id).contains(&day)
    }

    /// Store ids present in the matrix, including rows with no days checked.
    pub fn store_ids(&self) -> impl Iterator<Item = &str> {
        self.stores.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<Weekday>)> {
        self.stores.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Total planned visits across all stores and days.
    #[must_use]
    pub fn visit_count(&self) -> usize {
        self.stores.values().map(BTreeSet::len).sum()
    }

    /// `true` when no visit is planned at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visit_count() == 0
    }
}

/// Difference for one store between the loaded and the edited matrix.
///
/// `to_add` and `to_remove` are always disjoint, and at least one is
/// non-empty for any change emitted by [`compute_change_set`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleChange {
    pub store_id: String,
    pub to_add: BTreeSet<Weekday>,
    pub to_remove: BTreeSet<Weekday>,
}

impl ScheduleChange {
    /// Applies this change to the days a store had before the edit.
    #[must_use]
    pub fn apply(&self, days_before: &BTreeSet<Weekday>) -> BTreeSet<Weekday> {
        days_before
            .difference(&self.to_remove)
            .chain(self.to_add.iter())
            .copied()
            .collect()
    }
}

/// Minimal set of per-store changes, ordered by store id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub changes: Vec<ScheduleChange>,
}

impl ChangeSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduleChange> {
        self.changes.iter()
    }

    #[must_use]
    pub fn get(&self, store_id: &str) -> Option<&ScheduleChange> {
        self.changes.iter().find(|c| c.store_id == store_id)
    }

    /// Number of visit rows the change-set inserts.
    #[must_use]
    pub fn additions(&self) -> usize {
        self.changes.iter().map(|c| c.to_add.len()).sum()
    }

    /// Number of visit rows the change-set deletes.
    #[must_use]
    pub fn removals(&self) -> usize {
        self.changes.iter().map(|c| c.to_remove.len()).sum()
    }

    /// Applies every change to `before`, producing the converged schedule.
    ///
    /// Stores left with no days are dropped from the result.
    #[must_use]
    pub fn apply_to(&self, before: &WeeklySchedule) -> WeeklySchedule {
        let mut after = before.clone();
        for change in &self.changes {
            let days = change.apply(before.days(&change.store_id));
            if days.is_empty() {
                after.stores.remove(&change.store_id);
            } else {
                after.stores.insert(change.store_id.clone(), days);
            }
        }
        after
    }
}

/// Computes the change-set that converges `before` to `after`.
///
/// Every store present in either matrix is compared; a store absent from one
/// side counts as having no days there. Only stores whose day sets differ
/// produce a [`ScheduleChange`].
#[must_use]
pub fn compute_change_set(before: &WeeklySchedule, after: &WeeklySchedule) -> ChangeSet {
    let store_ids: BTreeSet<&str> = before.store_ids().chain(after.store_ids()).collect();

    let changes = store_ids
        .into_iter()
        .filter_map(|store_id| {
            let days_before = before.days(store_id);
            let days_after = after.days(store_id);

            let to_add: BTreeSet<Weekday> = days_after.difference(days_before).copied().collect();
            let to_remove: BTreeSet<Weekday> =
                days_before.difference(days_after).copied().collect();

            if to_add.is_empty() && to_remove.is_empty() {
                None
            } else {
                Some(ScheduleChange {
                    store_id: store_id.to_string(),
                    to_add,
                    to_remove,
                })
            }
        })
        .collect();

    ChangeSet { changes }
}

#[cfg(test)]
#[path = "schedule_test.rs"]
mod tests;
