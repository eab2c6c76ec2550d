//! Minimum-coverage simulation.
//!
//! Every application must keep at least one effective scope (a global
//! scope or an explicit association) after any scope mutation. The
//! check runs as a pure simulation over an in-memory snapshot of the
//! store: remove the mutated scope's current contribution, add its
//! proposed contribution, and reject if any application drops to zero.
//! Keeping it pure lets the rules be unit-tested without a store.

use std::collections::HashMap;

use authdesk_core::{DeskError, DeskResult};
use authdesk_core::models::scope::Scope;
use uuid::Uuid;

/// Simulates a scope mutation against a snapshot of the store.
///
/// `current` is the scope's persisted state (`None` for a create) and
/// `proposed` its state after the mutation (`None` for a delete, empty
/// slice for a global scope). The snapshot in `scopes` still contains
/// the pre-mutation version of the scope when one exists.
pub fn check_minimum_coverage(
    application_ids: &[Uuid],
    scopes: &[Scope],
    current: Option<&Scope>,
    proposed: Option<&[Uuid]>,
) -> DeskResult<()> {
    if application_ids.is_empty() {
        return Ok(());
    }

    let mut counts: HashMap<Uuid, i64> = application_ids.iter().map(|id| (*id, 0)).collect();

    for scope in scopes {
        if scope.is_global() {
            for count in counts.values_mut() {
                *count += 1;
            }
        } else {
            for app_id in &scope.application_ids {
                if let Some(count) = counts.get_mut(app_id) {
                    *count += 1;
                }
            }
        }
    }

    // Remove what the mutated scope contributes today.
    if let Some(scope) = current {
        if scope.is_global() {
            for count in counts.values_mut() {
                *count -= 1;
            }
        } else {
            for app_id in &scope.application_ids {
                if let Some(count) = counts.get_mut(app_id) {
                    *count -= 1;
                }
            }
        }
    }

    // Add back what it would contribute afterwards.
    if let Some(assignments) = proposed {
        if assignments.is_empty() {
            for count in counts.values_mut() {
                *count += 1;
            }
        } else {
            for app_id in assignments {
                if let Some(count) = counts.get_mut(app_id) {
                    *count += 1;
                }
            }
        }
    }

    // Iterate the slice, not the map, so the reported application is
    // deterministic.
    for app_id in application_ids {
        if counts.get(app_id).copied().unwrap_or(0) <= 0 {
            return Err(DeskError::MinimumScopeViolation {
                application_id: *app_id,
            });
        }
    }
    Ok(())
}

/// Normalizes a request's optional id list: absent means empty, and
/// duplicates collapse while preserving first-seen order.
pub fn dedup_ids(ids: Option<Vec<Uuid>>) -> Vec<Uuid> {
    let mut seen = Vec::new();
    for id in ids.unwrap_or_default() {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}
