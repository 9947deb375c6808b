use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Identity of the caller, resolved by the authenticating gateway in front of
/// the service. Every operation receives it explicitly and every repository
/// query is filtered by `owner_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerContext {
  pub owner_id: Uuid,
}

impl OwnerContext {
  pub fn new(owner_id: Uuid) -> Self {
    Self { owner_id }
  }

  pub fn owner_id(&self) -> Uuid {
    self.owner_id
  }
}

/// Coarse classification shared by all domain errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  /// Missing, or owned by someone else. The two cases are never distinguished.
  NotFound,
  Validation,
  BusinessRule,
  Persistence,
}

/// Source of "now" for status derivation and default due dates.
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;

  fn today(&self) -> NaiveDate {
    self.now().date_naive()
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> {
    Utc::now()
  }
}

/// Outcome of reconciling a submitted item list against the persisted one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemChanges {
  pub created: Vec<Uuid>,
  pub updated: Vec<Uuid>,
  pub removed: Vec<Uuid>,
}

impl ItemChanges {
  pub fn is_empty(&self) -> bool {
    self.created.is_empty() && self.updated.is_empty() && self.removed.is_empty()
  }
}

/// Assigns a final id to each submitted item.
///
/// A submitted id is kept only when it names an existing item that has not
/// already been claimed earlier in the list; anything else (no id, a
/// client-side placeholder, a duplicate) gets a fresh id. Existing items that
/// are not claimed are reported as removed.
pub fn reconcile_item_ids(existing: &[Uuid], submitted: &[Option<Uuid>]) -> (Vec<Uuid>, ItemChanges) {
  let known: HashSet<Uuid> = existing.iter().copied().collect();
  let mut claimed = HashSet::new();
  let mut changes = ItemChanges::default();

  let resolved = submitted
    .iter()
    .map(|candidate| match candidate {
      Some(id) if known.contains(id) && claimed.insert(*id) => {
        changes.updated.push(*id);
        *id
      }
      _ => {
        let id = Uuid::new_v4();
        changes.created.push(id);
        id
      }
    })
    .collect();

  changes.removed = existing
    .iter()
    .filter(|id| !claimed.contains(id))
    .copied()
    .collect();

  (resolved, changes)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_reconcile_keeps_known_ids() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();

    let (ids, changes) = reconcile_item_ids(&[a, b], &[Some(b)]);

    assert_eq!(ids, vec![b]);
    assert_eq!(changes.updated, vec![b]);
    assert_eq!(changes.removed, vec![a]);
    assert!(changes.created.is_empty());
  }

  #[test]
  fn test_reconcile_replaces_placeholder_ids() {
    let a = Uuid::new_v4();
    let placeholder = Uuid::new_v4();

    let (ids, changes) = reconcile_item_ids(&[a], &[Some(a), Some(placeholder), None]);

    assert_eq!(ids.len(), 3);
    assert_eq!(ids[0], a);
    assert_ne!(ids[1], placeholder);
    assert_eq!(changes.created.len(), 2);
    assert!(changes.removed.is_empty());
  }

  #[test]
  fn test_reconcile_duplicate_id_is_created_once() {
    let a = Uuid::new_v4();

    let (ids, changes) = reconcile_item_ids(&[a], &[Some(a), Some(a)]);

    assert_eq!(ids[0], a);
    assert_ne!(ids[1], a);
    assert_eq!(changes.updated, vec![a]);
    assert_eq!(changes.created.len(), 1);
  }

  #[test]
  fn test_system_clock_today_matches_now() {
    let clock = SystemClock;
    assert_eq!(clock.today(), clock.now().date_naive());
  }
}
