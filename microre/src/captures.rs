//! Fixed-capacity capture tracking
//!
//! A [`Captures`] value is plain `Copy` data so every backtracking branch can
//! carry its own table. Slots are numbered in the order their `(` is reached;
//! a `)` always closes the innermost group that is still open.

/// Number of capture slots. Groups past this are matched but not recorded.
pub const MAX_GROUPS: usize = 9;

/// Boundaries of one capture slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Group {
    pub start: usize,
    pub end: usize,
    /// Set once the group's `)` has been reached
    pub closed: bool,
}

/// Capture table for one branch of a match attempt
#[derive(Debug, Clone, Copy, Default)]
pub struct Captures {
    groups: [Group; MAX_GROUPS],
    count: u8,
    /// Slot indices of the groups currently open, innermost last
    open: [u8; MAX_GROUPS],
    open_len: u8,
    /// Open groups that did not get a slot
    overflow: u16,
}

impl Captures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the next group at `pos`
    pub fn open(&mut self, pos: usize) {
        let slot = self.count as usize;
        if slot >= MAX_GROUPS {
            self.overflow = self.overflow.saturating_add(1);
            return;
        }
        self.groups[slot] = Group {
            start: pos,
            end: pos,
            closed: false,
        };
        self.open[self.open_len as usize] = self.count;
        self.open_len += 1;
        self.count += 1;
    }

    /// End the innermost open group at `pos`. A stray `)` is ignored.
    pub fn close(&mut self, pos: usize) {
        if let Some(slot) = self.pop() {
            let group = &mut self.groups[slot];
            group.end = pos;
            group.closed = true;
        }
    }

    /// Leave the innermost open group without recording its end
    pub fn abandon(&mut self) {
        self.pop();
    }

    fn pop(&mut self) -> Option<usize> {
        if self.overflow > 0 {
            self.overflow -= 1;
            return None;
        }
        if self.open_len == 0 {
            return None;
        }
        self.open_len -= 1;
        Some(self.open[self.open_len as usize] as usize)
    }

    /// Drop every recorded end, keeping slot numbering and open groups
    pub fn forget_closed(&mut self) {
        for group in &mut self.groups[..self.count as usize] {
            group.closed = false;
        }
    }

    /// Number of groups currently open
    pub fn depth(&self) -> usize {
        self.open_len as usize + self.overflow as usize
    }

    /// Number of slots handed out so far
    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Span of group `n` (1-based), if it was closed
    pub fn get(&self, n: usize) -> Option<(usize, usize)> {
        let group = self.groups[..self.len()].get(n.checked_sub(1)?)?;
        group.closed.then_some((group.start, group.end))
    }

    /// Spans of every slot handed out, in group order
    pub fn iter(&self) -> impl Iterator<Item = Option<(usize, usize)>> + '_ {
        self.groups[..self.len()]
            .iter()
            .map(|g| g.closed.then_some((g.start, g.end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close_in_order() {
        let mut caps = Captures::new();
        caps.open(0);
        caps.close(1);
        caps.open(1);
        caps.close(2);
        assert_eq!(caps.len(), 2);
        assert_eq!(caps.get(1), Some((0, 1)));
        assert_eq!(caps.get(2), Some((1, 2)));
        assert_eq!(caps.get(0), None);
        assert_eq!(caps.get(3), None);
    }

    #[test]
    fn test_nested_groups_close_innermost() {
        let mut caps = Captures::new();
        caps.open(0);
        caps.open(1);
        assert_eq!(caps.depth(), 2);
        caps.close(2);
        caps.close(3);
        assert_eq!(caps.get(1), Some((0, 3)));
        assert_eq!(caps.get(2), Some((1, 2)));
        assert_eq!(caps.depth(), 0);
    }

    #[test]
    fn test_unclosed_group_is_absent() {
        let mut caps = Captures::new();
        caps.open(4);
        assert_eq!(caps.len(), 1);
        assert_eq!(caps.get(1), None);
        assert_eq!(caps.iter().collect::<Vec<_>>(), vec![None]);
    }

    #[test]
    fn test_groups_past_capacity_are_ignored() {
        let mut caps = Captures::new();
        for i in 0..MAX_GROUPS {
            caps.open(i);
        }
        caps.open(100);
        assert_eq!(caps.len(), MAX_GROUPS);
        assert_eq!(caps.depth(), MAX_GROUPS + 1);

        // The overflow group is innermost, so it absorbs the first close
        caps.close(200);
        assert_eq!(caps.get(MAX_GROUPS), None);
        caps.close(201);
        assert_eq!(caps.get(MAX_GROUPS), Some((MAX_GROUPS - 1, 201)));
    }

    #[test]
    fn test_copies_are_independent() {
        let mut a = Captures::new();
        a.open(0);
        let mut b = a;
        b.close(5);
        assert_eq!(a.get(1), None);
        assert_eq!(b.get(1), Some((0, 5)));
    }

    #[test]
    fn test_forget_and_abandon() {
        let mut caps = Captures::new();
        caps.open(0);
        caps.close(1);
        caps.open(1);
        caps.abandon();
        caps.forget_closed();
        assert_eq!(caps.len(), 2);
        assert_eq!(caps.depth(), 0);
        assert_eq!(caps.get(1), None);
        caps.close(9);
        assert_eq!(caps.get(2), None);
    }
}
