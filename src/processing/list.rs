//! List of lookup rows.
//!
//! Each row is validated when committed (the blur of its input). Only accepted
//! addresses reach the lookup service, and a row only takes the result of its
//! latest commit.

use crate::ipapi::{Locator, LookupCache, LookupError};
use crate::models::{IpLookupResult, IpLookupRow, LookupStatus, RowUpdate};
use crate::validation::{validate, ValidationOutcome};
use futures::future::join_all;

/// A lookup started by [`IpLookupList::commit`], to be handed back to
/// [`IpLookupList::resolve`] with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLookup {
    pub id: u64,
    pub generation: u64,
    /// Validated address to look up.
    pub ip: String,
}

#[derive(Debug, Clone)]
pub struct IpLookupList {
    rows: Vec<IpLookupRow>,
    next_id: u64,
}

impl Default for IpLookupList {
    fn default() -> Self {
        IpLookupList::new()
    }
}

impl IpLookupList {
    /// A list with one empty row.
    pub fn new() -> Self {
        let mut list = IpLookupList {
            rows: Vec::new(),
            next_id: 1,
        };
        list.push_row();
        list
    }

    /// One row per input. No inputs gives a single empty row.
    pub fn with_inputs<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = IpLookupList {
            rows: Vec::new(),
            next_id: 1,
        };
        for input in inputs {
            let id = list.push_row();
            list.set_input(id, input);
        }
        if list.rows.is_empty() {
            list.push_row();
        }
        list
    }

    pub fn rows(&self) -> &[IpLookupRow] {
        &self.rows
    }

    pub fn row(&self, id: u64) -> Option<&IpLookupRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    fn row_mut(&mut self, id: u64) -> Option<&mut IpLookupRow> {
        self.rows.iter_mut().find(|r| r.id == id)
    }

    fn push_row(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.push(IpLookupRow::new(id));
        id
    }

    /// True while any row waits for a lookup.
    pub fn is_loading(&self) -> bool {
        self.rows.iter().any(|r| r.is_loading())
    }

    /// Append an empty row. Refused while a lookup is running.
    pub fn add_row(&mut self) -> Option<u64> {
        if self.is_loading() {
            log::debug!("add_row refused while loading");
            return None;
        }
        Some(self.push_row())
    }

    /// Edit a row's text. Ignored while that row is loading.
    pub fn set_input(&mut self, id: u64, ip: impl Into<String>) -> bool {
        match self.row_mut(id) {
            Some(row) if !row.is_loading() => {
                row.apply(RowUpdate::Input(ip.into()));
                true
            }
            _ => false,
        }
    }

    /// Apply an update to one row. Returns false for an unknown id.
    pub fn update_row(&mut self, id: u64, update: RowUpdate) -> bool {
        match self.row_mut(id) {
            Some(row) => {
                row.apply(update);
                true
            }
            None => false,
        }
    }

    /// Validate a row's text. A rejected address marks the row failed and
    /// returns `None`; an accepted one marks it loading and returns the
    /// lookup to run.
    pub fn commit(&mut self, id: u64) -> Option<PendingLookup> {
        let row = self.row_mut(id)?;
        match validate(&row.ip) {
            ValidationOutcome::Rejected { reason } => {
                log::info!("row {id}: {:?} rejected: {reason}", row.ip);
                row.apply(RowUpdate::Failed(reason));
                None
            }
            ValidationOutcome::Accepted { normalized_address } => {
                row.apply(RowUpdate::Loading);
                row.generation += 1;
                log::info!(
                    "row {id}: lookup {normalized_address} (generation {})",
                    row.generation
                );
                Some(PendingLookup {
                    id,
                    generation: row.generation,
                    ip: normalized_address,
                })
            }
        }
    }

    /// Store the outcome of a lookup. Dropped (returns false) when the row
    /// was removed or committed again since.
    pub fn resolve(
        &mut self,
        pending: PendingLookup,
        outcome: Result<IpLookupResult, LookupError>,
    ) -> bool {
        let Some(row) = self.row_mut(pending.id) else {
            return false;
        };
        if row.generation != pending.generation {
            log::debug!(
                "row {}: dropping stale result for {} (generation {} < {})",
                pending.id,
                pending.ip,
                pending.generation,
                row.generation
            );
            return false;
        }
        match outcome {
            Ok(result) => row.apply(RowUpdate::Located(result)),
            Err(e) => row.apply(RowUpdate::Failed(e.to_string())),
        }
        true
    }

    /// Commit every row with text and run the accepted lookups concurrently.
    /// Returns the number of lookups made.
    pub async fn lookup_all<L: Locator>(&mut self, cache: &LookupCache<L>) -> usize {
        let ids: Vec<u64> = self
            .rows
            .iter()
            .filter(|r| !r.ip.trim().is_empty())
            .map(|r| r.id)
            .collect();
        let pending: Vec<PendingLookup> = ids.into_iter().filter_map(|id| self.commit(id)).collect();

        let outcomes = join_all(pending.iter().map(|p| cache.lookup(&p.ip))).await;

        let count = pending.len();
        for (p, outcome) in pending.into_iter().zip(outcomes) {
            self.resolve(p, outcome);
        }
        log::info!(
            "lookup_all: {count} lookups, {} ok, {} failed",
            self.count_status(LookupStatus::Success),
            self.count_status(LookupStatus::Error)
        );
        count
    }

    pub fn count_status(&self, status: LookupStatus) -> usize {
        self.rows.iter().filter(|r| r.status == status).count()
    }
}
