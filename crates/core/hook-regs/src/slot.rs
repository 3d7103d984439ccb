//! Fixed-width value cell for a single register
//!
//! A [`RegisterSlot`] owns exactly as many bytes as the register it stands for
//! and stores them in the host CPU's native encoding. Typed access goes through
//! `zerocopy`, so reading or writing a type wider than the slot is reported as
//! [`RegisterError::SizeMismatch`] instead of touching memory past the buffer.

use std::mem::size_of;

use log::{trace, warn};
use zerocopy::{FromBytes, Immutable, IntoBytes};

use crate::error::{RegisterError, Result};
use crate::register::Register;

/// Owned byte buffer holding one register value
#[derive(Debug, PartialEq, Eq)]
pub struct RegisterSlot {
    storage: Box<[u8]>,
}

impl RegisterSlot {
    /// Allocate a zero-filled slot of `size` bytes.
    ///
    /// Fails with [`RegisterError::Allocation`] when `size` is zero or the
    /// allocator cannot provide the buffer.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            warn!("Refusing to allocate an empty register slot");
            return Err(RegisterError::Allocation { size });
        }

        let mut storage = Vec::new();
        storage.try_reserve_exact(size).map_err(|err| {
            warn!("Register slot allocation of {} bytes failed: {}", size, err);
            RegisterError::Allocation { size }
        })?;
        storage.resize(size, 0);

        trace!("Allocated {}-byte register slot", size);
        Ok(Self {
            storage: storage.into_boxed_slice(),
        })
    }

    /// Allocate a slot sized for `reg`'s class.
    pub fn for_register(reg: Register) -> Result<Self> {
        Self::new(reg.size().bytes())
    }

    /// Width of the slot in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.storage.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.storage
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.storage
    }

    /// Replace the whole value with `bytes`, which must match the slot width
    /// exactly.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() != self.size() {
            return Err(RegisterError::SizeMismatch {
                requested: bytes.len(),
                available: self.size(),
            });
        }
        self.storage.copy_from_slice(bytes);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.storage.fill(0);
    }

    fn check_fits<T>(&self) -> Result<()> {
        let requested = size_of::<T>();
        if requested > self.size() {
            return Err(RegisterError::SizeMismatch {
                requested,
                available: self.size(),
            });
        }
        Ok(())
    }

    /// Read the leading `size_of::<T>()` bytes as a `T`.
    pub fn read<T: FromBytes>(&self) -> Result<T> {
        self.check_fits::<T>()?;
        T::read_from_prefix(&self.storage)
            .map(|(value, _)| value)
            .map_err(|_| RegisterError::SizeMismatch {
                requested: size_of::<T>(),
                available: self.size(),
            })
    }

    /// Overwrite the leading `size_of::<T>()` bytes with `value`. Any bytes
    /// past the end of `T` keep their previous contents.
    pub fn write<T: IntoBytes + Immutable>(&mut self, value: T) -> Result<()> {
        self.check_fits::<T>()?;
        let available = self.size();
        value
            .write_to_prefix(&mut self.storage)
            .map_err(|_| RegisterError::SizeMismatch {
                requested: size_of::<T>(),
                available,
            })
    }

    /// The slot value as a host address.
    ///
    /// Reads the widest unsigned integer of 1, 2, 4 or 8 bytes that fits both
    /// the slot and `usize`, zero-extended.
    pub fn address(&self) -> usize {
        let width = self.size().min(size_of::<usize>());
        let value = match width {
            8.. => self.read::<u64>().map(|v| v as usize),
            4..=7 => self.read::<u32>().map(|v| v as usize),
            2 | 3 => self.read::<u16>().map(usize::from),
            _ => self.read::<u8>().map(usize::from),
        };
        value.unwrap_or_default()
    }

    fn target(&self, offset: isize) -> *mut u8 {
        std::ptr::with_exposed_provenance_mut::<u8>(self.address()).wrapping_offset(offset)
    }

    /// Treat the slot value as an address, add `offset` bytes and load a `T`
    /// from there.
    ///
    /// # Safety
    ///
    /// No validation is performed. The caller must guarantee that
    /// `address() + offset` points to `size_of::<T>()` readable bytes in this
    /// process. A bad address faults the process.
    pub unsafe fn read_as_pointer<T: FromBytes>(&self, offset: isize) -> T {
        let ptr = self.target(offset).cast::<T>();
        // SAFETY: validity of the target is the caller's contract.
        unsafe { ptr.read_unaligned() }
    }

    /// Treat the slot value as an address, add `offset` bytes and store
    /// `value` there.
    ///
    /// # Safety
    ///
    /// Same contract as [`read_as_pointer`](Self::read_as_pointer), and the
    /// target bytes must also be writable and not aliased by a live Rust
    /// reference.
    pub unsafe fn write_as_pointer<T: IntoBytes>(&self, value: T, offset: isize) {
        let ptr = self.target(offset).cast::<T>();
        // SAFETY: validity of the target is the caller's contract.
        unsafe { ptr.write_unaligned(value) }
    }
}
