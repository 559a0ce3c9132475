//! LIFO record of the nested zones currently containing the perceiver

use crate::zone::ZoneId;

/// Stack of occupied zones; the top is the single active zone.
///
/// A zone leaves the stack only when it is on top and is the zone that
/// reported the exit. An exit from a zone buried under a still-occupied
/// nested zone is stale and leaves the ordering untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneStack {
    zones: Vec<ZoneId>,
}

impl ZoneStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the perceiver entered `zone`
    pub fn push(&mut self, zone: ZoneId) {
        self.zones.push(zone);
    }

    /// Remove `zone` if it is the top. Returns whether anything was popped.
    pub fn pop_if_top(&mut self, zone: ZoneId) -> bool {
        if self.is_top(zone) {
            self.zones.pop();
            true
        } else {
            false
        }
    }

    /// The active zone
    pub fn top(&self) -> Option<ZoneId> {
        self.zones.last().copied()
    }

    /// Check whether `zone` is the active zone
    pub fn is_top(&self, zone: ZoneId) -> bool {
        self.top() == Some(zone)
    }

    /// Check whether `zone` is anywhere in the stack
    pub fn contains(&self, zone: ZoneId) -> bool {
        self.zones.contains(&zone)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Iterate bottom (first entered) to top
    pub fn iter(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.zones.iter().copied()
    }

    pub fn clear(&mut self) {
        self.zones.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const Z1: ZoneId = ZoneId(1);
    const Z2: ZoneId = ZoneId(2);

    #[test]
    fn test_push_and_top() {
        let mut stack = ZoneStack::new();
        assert_eq!(stack.top(), None);

        stack.push(Z1);
        stack.push(Z2);
        assert_eq!(stack.top(), Some(Z2));
        assert!(stack.is_top(Z2));
        assert!(!stack.is_top(Z1));
        assert!(stack.contains(Z1));
    }

    #[test]
    fn test_stale_exit_leaves_stack_unchanged() {
        let mut stack = ZoneStack::new();
        stack.push(Z1);
        stack.push(Z2);

        assert!(!stack.pop_if_top(Z1));
        assert_eq!(stack.iter().collect::<Vec<_>>(), vec![Z1, Z2]);
    }

    #[test]
    fn test_nested_exit_in_order() {
        let mut stack = ZoneStack::new();
        stack.push(Z1);
        stack.push(Z2);

        assert!(stack.pop_if_top(Z2));
        assert_eq!(stack.top(), Some(Z1));
        assert!(stack.pop_if_top(Z1));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_pop_on_empty_is_noop() {
        let mut stack = ZoneStack::new();
        assert!(!stack.pop_if_top(Z1));
        assert_eq!(stack.len(), 0);
    }
}
