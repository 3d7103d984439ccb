//! Register bank for one hook invocation
//!
//! A [`RegisterBank`] materializes a [`RegisterSlot`] for each register a
//! calling convention asks for and nothing else. Slots are stored in an array
//! indexed by [`Register::index`], so lookup by name is O(1) and a register
//! that was never requested has no storage at all.
//!
//! The dispatch layer owns the bank for the duration of one invocation:
//! build it, copy the captured CPU values in, run the callback, copy the
//! values back out, then destroy it.

use std::fmt;

use log::debug;
use zerocopy::{FromBytes, Immutable, IntoBytes};

use crate::error::{RegisterError, Result};
use crate::register::Register;
use crate::requirements::RegisterRequirements;
use crate::slot::RegisterSlot;

/// Summary of what a bank holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BankStats {
    /// Number of materialized slots
    pub slots: usize,
    /// Total bytes owned by those slots
    pub bytes: usize,
}

/// Register values relevant to one intercepted call
pub struct RegisterBank {
    slots: [Option<RegisterSlot>; Register::COUNT],
}

impl RegisterBank {
    /// Build a bank holding one zeroed slot per distinct register in
    /// `requested`.
    ///
    /// Order does not matter and duplicates collapse to a single slot. If a
    /// slot cannot be allocated, every slot created so far is released before
    /// the error is returned.
    pub fn new<I>(requested: I) -> Result<Self>
    where
        I: IntoIterator<Item = Register>,
    {
        let mut slots: [Option<RegisterSlot>; Register::COUNT] = std::array::from_fn(|_| None);

        for reg in requested {
            let entry = &mut slots[reg.index()];
            if entry.is_none() {
                *entry = Some(RegisterSlot::for_register(reg)?);
            }
        }

        let bank = Self { slots };
        debug!(
            "Register bank ready with {} slots: {:?}",
            bank.len(),
            bank.registers().collect::<Vec<_>>()
        );
        Ok(bank)
    }

    /// Build a bank from whatever a calling-convention descriptor requires.
    pub fn from_requirements<R>(requirements: &R) -> Result<Self>
    where
        R: RegisterRequirements + ?Sized,
    {
        Self::new(requirements.required_registers())
    }

    /// A bank with no registers at all.
    pub fn empty() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    pub fn contains(&self, reg: Register) -> bool {
        self.slots[reg.index()].is_some()
    }

    /// Slot for `reg`, or `None` if it was not requested.
    pub fn get(&self, reg: Register) -> Option<&RegisterSlot> {
        self.slots[reg.index()].as_ref()
    }

    pub fn get_mut(&mut self, reg: Register) -> Option<&mut RegisterSlot> {
        self.slots[reg.index()].as_mut()
    }

    /// Slot for `reg`, failing with [`RegisterError::InvalidAccess`] if it was
    /// not requested.
    pub fn slot(&self, reg: Register) -> Result<&RegisterSlot> {
        self.get(reg).ok_or(RegisterError::InvalidAccess(reg))
    }

    pub fn slot_mut(&mut self, reg: Register) -> Result<&mut RegisterSlot> {
        self.get_mut(reg).ok_or(RegisterError::InvalidAccess(reg))
    }

    pub fn read<T: FromBytes>(&self, reg: Register) -> Result<T> {
        self.slot(reg)?.read()
    }

    pub fn write<T: IntoBytes + Immutable>(&mut self, reg: Register, value: T) -> Result<()> {
        self.slot_mut(reg)?.write(value)
    }

    /// Number of materialized slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Present registers in declaration order.
    pub fn registers(&self) -> impl Iterator<Item = Register> + '_ {
        self.iter().map(|(reg, _)| reg)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Register, &RegisterSlot)> {
        Register::ALL
            .into_iter()
            .zip(self.slots.iter())
            .filter_map(|(reg, slot)| slot.as_ref().map(|slot| (reg, slot)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Register, &mut RegisterSlot)> {
        Register::ALL
            .into_iter()
            .zip(self.slots.iter_mut())
            .filter_map(|(reg, slot)| slot.as_mut().map(|slot| (reg, slot)))
    }

    pub fn stats(&self) -> BankStats {
        self.iter().fold(BankStats::default(), |mut stats, (_, slot)| {
            stats.slots += 1;
            stats.bytes += slot.size();
            stats
        })
    }

    /// Release every slot and end the bank's life, returning how many slots
    /// were freed.
    pub fn destroy(self) -> usize {
        let released = self.len();
        drop(self);
        released
    }
}

impl Default for RegisterBank {
    fn default() -> Self {
        Self::empty()
    }
}

impl Drop for RegisterBank {
    fn drop(&mut self) {
        let stats = self.stats();
        debug!(
            "Releasing register bank: {} slots, {} bytes",
            stats.slots, stats.bytes
        );
    }
}

impl fmt::Debug for RegisterBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(reg, slot)| (reg, slot.as_bytes())))
            .finish()
    }
}
