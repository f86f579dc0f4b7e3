//! Slot+generation handle table for objects owned across the C boundary.
//!
//! A destroyed handle carries a stale generation and resolves to `None`
//! instead of dangling. Generations start at 1, so the handle value 0 is
//! never issued and hosts can use it as "no simulation".

/// Handle encoding: upper 32 bits = slot index, lower 32 bits = generation.
fn encode(slot: u32, generation: u32) -> u64 {
    (u64::from(slot) << 32) | u64::from(generation)
}

fn decode(handle: u64) -> (u32, u32) {
    ((handle >> 32) as u32, handle as u32)
}

struct Slot<T> {
    generation: u32,
    data: Option<T>,
}

/// Maps `u64` handles to owned values, reusing freed slots.
pub(crate) struct HandleTable<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
}

impl<T> HandleTable<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Insert a value and return its (non-zero) handle.
    pub(crate) fn insert(&mut self, value: T) -> u64 {
        if let Some(slot_idx) = self.free_list.pop() {
            let slot = &mut self.slots[slot_idx as usize];
            slot.data = Some(value);
            encode(slot_idx, slot.generation)
        } else {
            let slot_idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 1,
                data: Some(value),
            });
            encode(slot_idx, 1)
        }
    }

    pub(crate) fn get(&self, handle: u64) -> Option<&T> {
        let (slot_idx, generation) = decode(handle);
        let slot = self.slots.get(slot_idx as usize)?;
        if slot.generation != generation {
            return None;
        }
        slot.data.as_ref()
    }

    /// Remove the value behind a handle. Stale and unknown handles give
    /// `None`, so destroying twice is harmless.
    ///
    /// A slot whose generation would wrap back to 0 is retired rather than
    /// recycled, so an old handle can never resolve to a newer object.
    pub(crate) fn remove(&mut self, handle: u64) -> Option<T> {
        let (slot_idx, generation) = decode(handle);
        let slot = self.slots.get_mut(slot_idx as usize)?;
        if slot.generation != generation {
            return None;
        }
        let value = slot.data.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        if slot.generation != 0 {
            self.free_list.push(slot_idx);
        }
        Some(value)
    }

    /// Number of live values.
    pub(crate) fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.data.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_never_zero() {
        let mut table = HandleTable::new();
        for i in 0..4 {
            let h = table.insert(i);
            assert_ne!(h, 0);
            table.remove(h);
        }
        assert_eq!(table.get(0), None);
    }

    #[test]
    fn insert_get_remove() {
        let mut table = HandleTable::new();
        let h = table.insert(42i32);
        assert_eq!(table.get(h), Some(&42));
        assert_eq!(table.len(), 1);
        assert_eq!(table.remove(h), Some(42));
        assert_eq!(table.get(h), None);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn double_remove_returns_none() {
        let mut table = HandleTable::new();
        let h = table.insert(1i32);
        assert_eq!(table.remove(h), Some(1));
        assert_eq!(table.remove(h), None);
    }

    #[test]
    fn reused_slot_gets_new_generation() {
        let mut table = HandleTable::new();
        let h1 = table.insert(1i32);
        table.remove(h1);
        let h2 = table.insert(2i32);
        let (slot1, gen1) = decode(h1);
        let (slot2, gen2) = decode(h2);
        assert_eq!(slot1, slot2);
        assert_eq!(gen2, gen1 + 1);
        assert_eq!(table.get(h1), None);
        assert_eq!(table.get(h2), Some(&2));
    }

    #[test]
    fn unknown_slot_returns_none() {
        let table: HandleTable<i32> = HandleTable::new();
        assert_eq!(table.get(encode(999, 1)), None);
    }

    #[test]
    fn wrapped_generation_retires_slot() {
        let mut table = HandleTable::new();
        let h = table.insert(1i32);
        table.remove(h);
        table.slots[0].generation = u32::MAX;

        let last = table.insert(2i32);
        assert_eq!(decode(last), (0, u32::MAX));
        table.remove(last);
        assert_eq!(table.slots[0].generation, 0);
        assert!(!table.free_list.contains(&0));

        let fresh = table.insert(3i32);
        assert_eq!(decode(fresh).0, 1);
        assert_eq!(table.get(encode(0, 0)), None);
    }
}
