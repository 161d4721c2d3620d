//! Slot-arena object pool
//!
//! Short-lived entities (projectiles, particles) churn every frame, so
//! they live in pre-allocated slots addressed by index with a free list
//! of recycled positions. Allocation pops a free slot and hands it to
//! the caller for a full field reset; release pushes the index back.
//! Iteration walks slots in index order, which keeps visitation
//! deterministic for a given allocation history.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Slot<T> {
    alive: bool,
    item: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T: Default> Default for Pool<T> {
    fn default() -> Self {
        Self { slots: Vec::new(), free: Vec::new(), live: 0 }
    }
}

impl<T: Default> Pool<T> {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            slots: Vec::with_capacity(cap),
            free: Vec::with_capacity(cap),
            live: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Claim a slot and return a mutable reference to its record. The
    /// record holds whatever the previous occupant left; the caller
    /// resets every field.
    pub fn alloc(&mut self) -> &mut T {
        self.live += 1;
        match self.free.pop() {
            Some(idx) => {
                let slot = &mut self.slots[idx as usize];
                slot.alive = true;
                &mut slot.item
            }
            None => {
                let idx = self.slots.len();
                self.slots.push(Slot { alive: true, item: T::default() });
                &mut self.slots[idx].item
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter(|s| s.alive).map(|s| &s.item)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter(|s| s.alive).map(|s| &mut s.item)
    }

    /// Release every live record matching the predicate. Runs at the end
    /// of a frame after systems have flagged records expired.
    pub fn release_where(&mut self, mut expired: impl FnMut(&T) -> bool) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.alive && expired(&slot.item) {
                slot.alive = false;
                self.free.push(idx as u32);
                self.live -= 1;
            }
        }
    }

    /// Logical reset of every slot; no stale records survive a restart.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }
}
