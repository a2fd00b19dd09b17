//! Store change notifications.
//!
//! Every committed store mutation is published as one [`StoreChange`].
//! Consumers (the 3D scene session, the host's dirty tracking) read the
//! element data back from the store by id.

use crate::id::ElementId;
use crate::model::{ChangeSet, ElementField};

#[derive(Debug, Clone, PartialEq)]
pub enum StoreChange {
    Added(ElementId),
    Updated { id: ElementId, changes: ChangeSet },
    Removed(ElementId),
    /// The whole element list was swapped (import, plan load).
    Replaced,
}

impl StoreChange {
    pub fn id(&self) -> Option<ElementId> {
        match self {
            Self::Added(id) | Self::Removed(id) | Self::Updated { id, .. } => Some(*id),
            Self::Replaced => None,
        }
    }

    /// Whether the plan's footprint may have changed, i.e. the plan center
    /// needs recomputing.
    pub fn moves_footprint(&self) -> bool {
        match self {
            Self::Added(_) | Self::Removed(_) | Self::Replaced => true,
            Self::Updated { changes, .. } => {
                changes.contains(ElementField::Position) || changes.contains(ElementField::Size)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_alone_keeps_footprint() {
        let id = ElementId::intern("chg-a");
        let rotated = StoreChange::Updated {
            id,
            changes: [ElementField::Rotation].into_iter().collect(),
        };
        assert!(!rotated.moves_footprint());
        assert_eq!(rotated.id(), Some(id));

        let resized = StoreChange::Updated {
            id,
            changes: [ElementField::Size].into_iter().collect(),
        };
        assert!(resized.moves_footprint());
        assert_eq!(StoreChange::Replaced.id(), None);
    }
}
