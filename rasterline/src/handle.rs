// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generation-checked slot storage behind [`Session`](crate::Session) handles.

use crate::error::Error;

const GENERATION_MASK: u32 = 0x00FF_FFFF;

/// A slot index plus the generation it was issued at, tagged with the kind of
/// table that issued it.
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed and every handle to it goes stale.
/// - On reuse of a freed slot, its generation is incremented, so stale
///   handles never alias the new value.
///
/// Generations are 24 bits wide and wrap, skipping zero; a raw value of `0`
/// is never issued.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct Handle {
    index: u32,
    generation: u32,
    kind: u8,
}

impl Handle {
    /// Packs as `kind << 56 | generation << 32 | index`.
    pub(crate) const fn to_raw(self) -> u64 {
        ((self.kind as u64) << 56) | ((self.generation as u64) << 32) | self.index as u64
    }

    #[allow(clippy::cast_possible_truncation, reason = "fields are masked before narrowing")]
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self {
            index: (raw & 0xFFFF_FFFF) as u32,
            generation: ((raw >> 32) as u32) & GENERATION_MASK,
            kind: (raw >> 56) as u8,
        }
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Values addressed by [`Handle`]s of one kind.
#[derive(Debug)]
pub(crate) struct HandleTable<T> {
    kind: u8,
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T> HandleTable<T> {
    pub(crate) const fn new(kind: u8) -> Self {
        Self {
            kind,
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    pub(crate) fn insert(&mut self, value: T) -> Handle {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = next_generation(slot.generation);
            slot.value = Some(value);
            return Handle {
                index,
                generation: slot.generation,
                kind: self.kind,
            };
        }
        #[allow(clippy::cast_possible_truncation, reason = "tables never reach 2^32 slots")]
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 1,
            value: Some(value),
        });
        Handle {
            index,
            generation: 1,
            kind: self.kind,
        }
    }

    fn slot_index(&self, handle: Handle) -> Result<usize, Error> {
        let index = handle.index as usize;
        let valid = handle.kind == self.kind
            && self.slots.get(index).is_some_and(|slot| {
                slot.generation == handle.generation && slot.value.is_some()
            });
        if valid {
            Ok(index)
        } else {
            log::warn!(
                "rejected handle {:#x} (kind {}, generation {}, slot {})",
                handle.to_raw(),
                handle.kind,
                handle.generation,
                handle.index
            );
            Err(Error::InvalidHandle)
        }
    }

    pub(crate) fn get(&self, handle: Handle) -> Result<&T, Error> {
        let index = self.slot_index(handle)?;
        self.slots[index].value.as_ref().ok_or(Error::InvalidHandle)
    }

    pub(crate) fn get_mut(&mut self, handle: Handle) -> Result<&mut T, Error> {
        let index = self.slot_index(handle)?;
        self.slots[index].value.as_mut().ok_or(Error::InvalidHandle)
    }

    /// Borrow two distinct live values, the first mutably.
    ///
    /// Returns `Ok(None)` when both handles name the same value.
    pub(crate) fn pair_mut(&mut self, a: Handle, b: Handle) -> Result<Option<(&mut T, &T)>, Error> {
        let ia = self.slot_index(a)?;
        let ib = self.slot_index(b)?;
        if ia == ib {
            return Ok(None);
        }
        let (first, second) = if ia < ib {
            let (lo, hi) = self.slots.split_at_mut(ib);
            (&mut lo[ia], &hi[0])
        } else {
            let (lo, hi) = self.slots.split_at_mut(ia);
            (&mut hi[0], &lo[ib])
        };
        match (first.value.as_mut(), second.value.as_ref()) {
            (Some(x), Some(y)) => Ok(Some((x, y))),
            _ => Err(Error::InvalidHandle),
        }
    }

    pub(crate) fn remove(&mut self, handle: Handle) -> Result<T, Error> {
        let index = self.slot_index(handle)?;
        let value = self.slots[index].value.take().ok_or(Error::InvalidHandle)?;
        self.free.push(handle.index);
        self.live -= 1;
        Ok(value)
    }

    pub(crate) fn len(&self) -> usize {
        self.live
    }
}

fn next_generation(generation: u32) -> u32 {
    match generation.wrapping_add(1) & GENERATION_MASK {
        0 => 1,
        g => g,
    }
}
