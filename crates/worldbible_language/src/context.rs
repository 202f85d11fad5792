//! Read-only world access for rule evaluation.

use worldbible_foundation::{ElementId, ElementKind};
use worldbible_storage::{World, WorldElement};

// =============================================================================
// RuleContext Trait
// =============================================================================

/// What a rule may see of the world.
///
/// Rules never mutate; contradictions leave the interpreter only through
/// its report sink.
pub trait RuleContext {
    /// Looks up an element.
    fn element(&self, id: ElementId) -> Option<&WorldElement>;

    /// All element ids in a stable order.
    fn element_ids(&self) -> Vec<ElementId>;

    /// Ids of elements of one kind, in the same stable order.
    fn element_ids_of_kind(&self, kind: ElementKind) -> Vec<ElementId>;
}

impl RuleContext for World {
    fn element(&self, id: ElementId) -> Option<&WorldElement> {
        World::element(self, id)
    }

    fn element_ids(&self) -> Vec<ElementId> {
        World::element_ids(self).collect()
    }

    fn element_ids_of_kind(&self, kind: ElementKind) -> Vec<ElementId> {
        self.elements_of_kind(kind).map(|e| e.id).collect()
    }
}
