//! Slot arena owning every body of a solver
//!
//! Slots are reused through a free list. Each slot carries a generation that
//! is bumped on removal, so a `BodyId` handed out earlier never resolves to a
//! body added later into the same slot.

use crate::simulation::states::{Body, BodyId};

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    body: Option<Body>,
}

#[derive(Debug, Clone, Default)]
pub struct BodyArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl BodyArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, body: Body) -> BodyId {
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.body = Some(body);
            return BodyId { index, generation: slot.generation };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot { generation: 0, body: Some(body) });
        BodyId { index, generation: 0 }
    }

    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        let body = slot.body.take()?;

        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(body)
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.body.as_ref()
    }

    /// Drop every body; outstanding ids all go stale
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.body.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.len = 0;
    }

    /// Live bodies in slot order
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &Body)> + Clone + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.body.as_ref().map(|b| {
                (BodyId { index: index as u32, generation: slot.generation }, b)
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyId, &mut Body)> + '_ {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.body.as_mut().map(|b| (BodyId { index: index as u32, generation }, b))
        })
    }

    /// Live bodies keyed by raw slot index, as stored in the spatial grid
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &Body)> + Clone + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.body.as_ref().map(|b| (index, b)))
    }

    pub fn slot(&self, index: usize) -> Option<&Body> {
        self.slots.get(index)?.body.as_ref()
    }

    /// Handle for whatever currently lives in slot `index`
    pub fn id_at(&self, index: usize) -> Option<BodyId> {
        let slot = self.slots.get(index)?;
        slot.body.as_ref()?;
        Some(BodyId { index: index as u32, generation: slot.generation })
    }

    /// Two distinct live slots borrowed mutably at once, in argument order.
    /// `None` when `a == b` or either slot is empty.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> Option<(&mut Body, &mut Body)> {
        if a == b || a >= self.slots.len() || b >= self.slots.len() {
            return None;
        }

        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (left, right) = self.slots.split_at_mut(hi);
        let low = left[lo].body.as_mut()?;
        let high = right[0].body.as_mut()?;

        if a < b {
            Some((low, high))
        } else {
            Some((high, low))
        }
    }
}
