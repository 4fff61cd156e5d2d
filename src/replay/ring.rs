use tracing::trace;

#[derive(Debug, Clone)]
pub(crate) struct Slot<P> {
    pub(crate) payload: P,
    pub(crate) raw_weight: f64,
    pub(crate) id: u64,
}

/// Fixed-capacity storage that overwrites the oldest slot once full.
///
/// Sample `id`s count up from zero and never repeat, so slot `id % capacity`
/// holds id `id` for as long as it has not been overwritten.
#[derive(Debug, Clone)]
pub(crate) struct Ring<P> {
    slots: Vec<Slot<P>>,
    capacity: usize,
    next_id: u64,
}

impl<P> Ring<P> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            next_id: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stores `payload` and returns its id and slot index.
    pub(crate) fn push(&mut self, payload: P, raw_weight: f64) -> (u64, usize) {
        let id = self.next_id;
        let index = (id % self.capacity as u64) as usize;
        let slot = Slot {
            payload,
            raw_weight,
            id,
        };
        if index < self.slots.len() {
            let evicted = std::mem::replace(&mut self.slots[index], slot);
            trace!(evicted = evicted.id, id, "replay slot overwritten");
        } else {
            self.slots.push(slot);
        }
        self.next_id += 1;
        (id, index)
    }

    /// Slot index of a live id, `None` once it has been overwritten.
    pub(crate) fn index_of(&self, id: u64) -> Option<usize> {
        if id >= self.next_id || self.next_id - id > self.slots.len() as u64 {
            return None;
        }
        let index = (id % self.capacity as u64) as usize;
        self.slots
            .get(index)
            .filter(|slot| slot.id == id)
            .map(|_| index)
    }

    pub(crate) fn slot(&self, index: usize) -> &Slot<P> {
        &self.slots[index]
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut Slot<P> {
        &mut self.slots[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrites_oldest_first() {
        let mut ring = Ring::new(3);
        for i in 0..5 {
            ring.push(i, 0.0);
        }
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.index_of(0), None);
        assert_eq!(ring.index_of(1), None);
        assert_eq!(ring.index_of(2), Some(2));
        assert_eq!(ring.index_of(3), Some(0));
        assert_eq!(ring.index_of(4), Some(1));
        assert_eq!(ring.index_of(5), None);
        assert_eq!(ring.slot(0).payload, 3);
    }

    #[test]
    fn ids_before_wraparound() {
        let mut ring = Ring::new(4);
        let (id, index) = ring.push("a", 1.5);
        assert_eq!((id, index), (0, 0));
        assert_eq!(ring.index_of(0), Some(0));
        assert_eq!(ring.index_of(1), None);
        ring.slot_mut(0).raw_weight = 2.0;
        assert_eq!(ring.slot(0).raw_weight, 2.0);
        assert_eq!(ring.capacity(), 4);
    }
}
