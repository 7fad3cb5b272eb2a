//! Active annotation registry
//!
//! Owned by whoever drives the frame loop (normally the
//! [`AnnotationManager`](crate::annotation::manager::AnnotationManager)) and
//! passed to placers explicitly. Placers never read the registry directly
//! during a frame; they read a [`PeerSnapshot`] taken before the pass starts.

use slotmap::SlotMap;

use crate::foundation::math::Vec3;

slotmap::new_key_type! {
    /// Registry key of a live annotation
    pub struct AnnotationId;
}

#[derive(Debug, Clone, Copy)]
struct RegistryEntry {
    position: Vec3,
    anchor_live: bool,
}

/// A live annotation as seen by its peers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peer {
    /// Registry key
    pub id: AnnotationId,
    /// Label position from the peer's most recent update
    pub position: Vec3,
    /// Whether the peer's anchor still exists
    pub anchor_live: bool,
}

/// Frozen copy of the registry at the start of a frame
#[derive(Debug, Clone, Default)]
pub struct PeerSnapshot {
    peers: Vec<Peer>,
}

impl PeerSnapshot {
    /// Build a snapshot from an explicit peer list
    pub fn from_peers(peers: Vec<Peer>) -> Self {
        Self { peers }
    }

    /// All peers in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Peer> {
        self.peers.iter()
    }

    /// Peers that compete for space with `self_id`
    ///
    /// Skips `self_id` and any peer whose anchor is gone.
    pub fn competitors(&self, self_id: Option<AnnotationId>) -> impl Iterator<Item = &Peer> {
        self.peers
            .iter()
            .filter(move |peer| Some(peer.id) != self_id && peer.anchor_live)
    }

    /// Number of peers in the snapshot
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// Whether the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

/// Set of currently live annotations and their last committed positions
#[derive(Debug, Default)]
pub struct AnnotationRegistry {
    entries: SlotMap<AnnotationId, RegistryEntry>,
}

impl AnnotationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a live annotation at `position`
    pub fn register(&mut self, position: Vec3, anchor_live: bool) -> AnnotationId {
        let id = self.entries.insert(RegistryEntry { position, anchor_live });
        log::trace!("Registered annotation {:?} at {:?}", id, position);
        id
    }

    /// Remove an annotation, returning whether it was present
    pub fn unregister(&mut self, id: AnnotationId) -> bool {
        let removed = self.entries.remove(id).is_some();
        if removed {
            log::trace!("Unregistered annotation {:?}", id);
        }
        removed
    }

    /// Whether `id` is currently registered
    pub fn contains(&self, id: AnnotationId) -> bool {
        self.entries.contains_key(id)
    }

    /// Record the outcome of an annotation's latest update
    ///
    /// Only call between passes; the snapshot a pass reads is not affected.
    pub fn commit(&mut self, id: AnnotationId, position: Vec3, anchor_live: bool) -> bool {
        match self.entries.get_mut(id) {
            Some(entry) => {
                entry.position = position;
                entry.anchor_live = anchor_live;
                true
            }
            None => false,
        }
    }

    /// Last committed position of an annotation
    pub fn position(&self, id: AnnotationId) -> Option<Vec3> {
        self.entries.get(id).map(|entry| entry.position)
    }

    /// Copy every live annotation for a read-only pass
    pub fn snapshot(&self) -> PeerSnapshot {
        PeerSnapshot {
            peers: self
                .entries
                .iter()
                .map(|(id, entry)| Peer {
                    id,
                    position: entry.position,
                    anchor_live: entry.anchor_live,
                })
                .collect(),
        }
    }

    /// Number of registered annotations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every annotation
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_unregister() {
        let mut registry = AnnotationRegistry::new();
        let a = registry.register(Vec3::zeros(), true);
        let b = registry.register(Vec3::new(1.0, 0.0, 0.0), true);
        assert_eq!(registry.len(), 2);

        assert!(registry.unregister(a));
        assert!(!registry.unregister(a));
        assert!(!registry.contains(a));
        assert!(registry.contains(b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_snapshot_is_not_affected_by_later_commits() {
        let mut registry = AnnotationRegistry::new();
        let id = registry.register(Vec3::zeros(), true);
        let snapshot = registry.snapshot();

        registry.commit(id, Vec3::new(5.0, 0.0, 0.0), true);

        assert_eq!(snapshot.iter().next().map(|p| p.position), Some(Vec3::zeros()));
        assert_eq!(registry.position(id), Some(Vec3::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn test_competitors_skip_self_and_dead_anchors() {
        let mut registry = AnnotationRegistry::new();
        let me = registry.register(Vec3::zeros(), true);
        let live = registry.register(Vec3::new(1.0, 0.0, 0.0), true);
        let _dead = registry.register(Vec3::new(2.0, 0.0, 0.0), false);

        let snapshot = registry.snapshot();
        let ids: Vec<_> = snapshot.competitors(Some(me)).map(|p| p.id).collect();
        assert_eq!(ids, vec![live]);
        assert_eq!(snapshot.competitors(None).count(), 2);
    }

    #[test]
    fn test_commit_unknown_id_is_rejected() {
        let mut registry = AnnotationRegistry::new();
        let id = registry.register(Vec3::zeros(), true);
        registry.unregister(id);
        assert!(!registry.commit(id, Vec3::zeros(), true));
    }
}
