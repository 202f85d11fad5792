//! Merging detected candidates into element conflict lists.

use tracing::{debug, warn};
use worldbible_foundation::{ConflictId, ElementId};
use worldbible_storage::World;

use super::ConflictCandidate;

/// What [`apply_candidates`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Newly recorded conflicts as `(reporting element, conflict)`.
    pub added: Vec<(ElementId, ConflictId)>,
    /// Candidates already on record with the same counterpart and description.
    pub duplicates: usize,
    /// Candidates naming an element that no longer exists.
    pub dropped: usize,
}

/// Appends each candidate as an unresolved conflict on its source element.
///
/// A candidate is skipped when the source already holds a conflict with the
/// same counterpart and description, whatever its status, so a resolution
/// or dismissal is never overwritten or re-raised.
pub fn apply_candidates<I>(world: &mut World, candidates: I) -> MergeOutcome
where
    I: IntoIterator<Item = ConflictCandidate>,
{
    let mut outcome = MergeOutcome::default();

    for candidate in candidates {
        let Some(source) = world.element(candidate.source_id) else {
            warn!(source = %candidate.source_id, "dropping candidate for missing source");
            outcome.dropped += 1;
            continue;
        };
        let on_record = source.conflicts.iter().any(|c| {
            c.with_element_id == candidate.target_id && c.description == candidate.description
        });
        if on_record {
            outcome.duplicates += 1;
            continue;
        }

        match world.add_conflict(
            candidate.source_id,
            candidate.target_id,
            candidate.description,
            candidate.severity,
        ) {
            Ok(conflict) => outcome.added.push((candidate.source_id, conflict)),
            Err(e) => {
                warn!(target = %candidate.target_id, error = %e, "dropping candidate");
                outcome.dropped += 1;
            }
        }
    }

    debug!(
        added = outcome.added.len(),
        duplicates = outcome.duplicates,
        dropped = outcome.dropped,
        "candidates merged"
    );
    outcome
}
