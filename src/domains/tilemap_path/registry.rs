use super::types::SpriteId;
use std::collections::HashSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Called with the sprite when it walks the last segment of a path.
pub type FinishHandler = Arc<dyn Fn(&SpriteId) + Send + Sync>;

#[derive(Debug, Default)]
struct Membership {
    following: HashSet<SpriteId>,
    pending_stop: HashSet<SpriteId>,
}

/// Which sprites are following a path, which of them have a stop pending,
/// and the single finish handler.
///
/// A sprite is only ever in `pending_stop` while it is also in `following`.
/// Locks are never held across an await point.
#[derive(Default)]
pub struct FollowRegistry {
    membership: RwLock<Membership>,
    finish_handler: RwLock<Option<FinishHandler>>,
}

impl FollowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, sprite: &SpriteId) {
        self.write().following.insert(sprite.clone());
    }

    pub fn is_following(&self, sprite: &SpriteId) -> bool {
        self.read().following.contains(sprite)
    }

    pub fn is_stop_pending(&self, sprite: &SpriteId) -> bool {
        self.read().pending_stop.contains(sprite)
    }

    /// Marks a following sprite for stopping. Returns false, and changes
    /// nothing, when the sprite is not following.
    pub fn mark_stop_pending(&self, sprite: &SpriteId) -> bool {
        let mut membership = self.write();
        if !membership.following.contains(sprite) {
            return false;
        }
        membership.pending_stop.insert(sprite.clone());
        true
    }

    /// If a stop is pending, removes the sprite from both sets and returns true.
    pub fn take_pending_stop(&self, sprite: &SpriteId) -> bool {
        let mut membership = self.write();
        if !membership.pending_stop.remove(sprite) {
            return false;
        }
        membership.following.remove(sprite);
        true
    }

    pub fn unregister(&self, sprite: &SpriteId) {
        let mut membership = self.write();
        membership.following.remove(sprite);
        membership.pending_stop.remove(sprite);
    }

    pub fn following_count(&self) -> usize {
        self.read().following.len()
    }

    /// Replaces the finish handler. Only the most recent registration is kept.
    pub fn set_finish_handler(&self, handler: FinishHandler) {
        let mut slot = self
            .finish_handler
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(handler);
    }

    pub fn finish_handler(&self) -> Option<FinishHandler> {
        self.finish_handler
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, Membership> {
        self.membership
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Membership> {
        self.membership
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_stop_only_marks_following_sprites() {
        let registry = FollowRegistry::new();
        let hero = SpriteId::from("hero");

        assert!(!registry.mark_stop_pending(&hero));
        assert!(!registry.is_stop_pending(&hero));

        registry.register(&hero);
        assert!(registry.mark_stop_pending(&hero));
        assert!(registry.is_stop_pending(&hero));
        assert!(registry.is_following(&hero));
    }

    #[test]
    fn test_take_pending_stop_clears_both_sets() {
        let registry = FollowRegistry::new();
        let hero = SpriteId::from("hero");
        registry.register(&hero);

        assert!(!registry.take_pending_stop(&hero));
        assert!(registry.is_following(&hero));

        registry.mark_stop_pending(&hero);
        assert!(registry.take_pending_stop(&hero));
        assert!(!registry.is_following(&hero));
        assert!(!registry.is_stop_pending(&hero));
        assert_eq!(registry.following_count(), 0);
    }

    #[test]
    fn test_last_finish_handler_wins() {
        let registry = FollowRegistry::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let counter = first.clone();
        registry.set_finish_handler(Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let counter = second.clone();
        registry.set_finish_handler(Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let handler = registry.finish_handler().expect("handler registered");
        handler(&SpriteId::from("hero"));

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }
}
