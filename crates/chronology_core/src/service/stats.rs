//! Derived chronology statistics.
//!
//! # Invariants
//! - Stats are a pure function of the record slice and never cached.
//! - `closed == final_success + fail`.
//! - `efficiency` is an integer percent rounded half away from zero, and `0`
//!   when nothing is closed.

use crate::model::record::ChronologyRecord;
use serde::Serialize;

/// Aggregate counters over the whole store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStats {
    pub total: usize,
    /// Records with status `satisfied`.
    pub final_success: usize,
    /// Records with status `rejected` or `ignored`.
    pub fail: usize,
    pub closed: usize,
    /// Share of successful closures, percent.
    pub efficiency: u32,
}

/// Computes stats for the given records.
pub fn compute_stats(records: &[ChronologyRecord]) -> CaseStats {
    let final_success = records
        .iter()
        .filter(|record| record.status.is_success())
        .count();
    let fail = records
        .iter()
        .filter(|record| record.status.is_failure())
        .count();
    let closed = final_success + fail;

    CaseStats {
        total: records.len(),
        final_success,
        fail,
        closed,
        efficiency: efficiency_percent(final_success, closed),
    }
}

fn efficiency_percent(success: usize, closed: usize) -> u32 {
    if closed == 0 {
        return 0;
    }
    // Integer form of round(success / closed * 100); operands are non-negative.
    let rounded = (success as u64 * 200 + closed as u64) / (closed as u64 * 2);
    rounded as u32
}
