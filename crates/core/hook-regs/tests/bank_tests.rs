//! Hook-Regs Integration Tests
//!
//! Exercises the register bank the way a hook dispatcher drives it:
//! - building a bank from a calling convention's register set
//! - copying captured CPU values in and patched values back out
//! - reading pointer arguments through register values

use hook_regs::{
    HookRegsConfig, Register, RegisterBank, RegisterError, RegisterRequirements,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Stand-in for the CPU state a trampoline would capture.
#[derive(Debug, Default, Clone, PartialEq)]
struct CapturedContext {
    eax: u32,
    ecx: u32,
    edx: u32,
    st0: [u8; 10],
}

impl CapturedContext {
    fn bytes_of(&self, reg: Register) -> Option<Vec<u8>> {
        match reg {
            Register::Eax => Some(self.eax.to_ne_bytes().to_vec()),
            Register::Ecx => Some(self.ecx.to_ne_bytes().to_vec()),
            Register::Edx => Some(self.edx.to_ne_bytes().to_vec()),
            Register::St0 => Some(self.st0.to_vec()),
            _ => None,
        }
    }

    fn store(&mut self, reg: Register, bytes: &[u8]) {
        match reg {
            Register::Eax => self.eax = u32::from_ne_bytes(bytes.try_into().unwrap()),
            Register::Ecx => self.ecx = u32::from_ne_bytes(bytes.try_into().unwrap()),
            Register::Edx => self.edx = u32::from_ne_bytes(bytes.try_into().unwrap()),
            Register::St0 => self.st0.copy_from_slice(bytes),
            _ => {}
        }
    }
}

/// Minimal dispatcher: capture, callback, write back, destroy.
fn dispatch<R, F>(requirements: &R, ctx: &mut CapturedContext, callback: F) -> usize
where
    R: RegisterRequirements + ?Sized,
    F: FnOnce(&mut RegisterBank),
{
    let mut bank = RegisterBank::from_requirements(requirements).unwrap();

    for (reg, slot) in bank.iter_mut() {
        let bytes = ctx.bytes_of(reg).expect("register captured");
        slot.load_bytes(&bytes).unwrap();
    }

    callback(&mut bank);

    for (reg, slot) in bank.iter() {
        ctx.store(reg, slot.as_bytes());
    }

    bank.destroy()
}

// ============================================================================
// End-to-End Scenarios
// ============================================================================

#[test]
fn test_gp_and_simd_bank() {
    init_logging();

    let mut bank = RegisterBank::new([Register::Eax, Register::Xmm0]).unwrap();

    let a = bank.get(Register::Eax).expect("eax present");
    assert_eq!(a.size(), 4);
    let b = bank.get(Register::Xmm0).expect("xmm0 present");
    assert_eq!(b.size(), 16);
    assert!(bank.get(Register::Ecx).is_none());

    let a = bank.get_mut(Register::Eax).unwrap();
    a.write(0xDEAD_BEEFu32).unwrap();
    assert_eq!(a.read::<u32>().unwrap(), 0xDEAD_BEEF);

    assert_eq!(bank.destroy(), 2);
}

#[test]
fn test_callback_rewrites_return_value() {
    init_logging();

    let mut ctx = CapturedContext {
        eax: 1,
        ecx: 0x1000,
        edx: 7,
        ..Default::default()
    };

    let released = dispatch(&[Register::Ecx, Register::Eax], &mut ctx, |bank| {
        assert_eq!(bank.read::<u32>(Register::Ecx).unwrap(), 0x1000);
        bank.write(Register::Eax, 42u32).unwrap();
        assert_eq!(
            bank.read::<u32>(Register::Edx),
            Err(RegisterError::InvalidAccess(Register::Edx))
        );
    });

    assert_eq!(released, 2);
    assert_eq!(ctx.eax, 42);
    assert_eq!(ctx.ecx, 0x1000);
    // Registers outside the convention are never touched.
    assert_eq!(ctx.edx, 7);
}

#[test]
fn test_x87_return_value_patch() {
    init_logging();

    let mut ctx = CapturedContext {
        st0: [0xAA; 10],
        ..Default::default()
    };

    dispatch(&[Register::St0], &mut ctx, |bank| {
        let slot = bank.slot_mut(Register::St0).unwrap();
        assert_eq!(slot.read::<[u8; 10]>().unwrap(), [0xAA; 10]);
        slot.write([0x11u8; 10]).unwrap();
    });

    assert_eq!(ctx.st0, [0x11; 10]);
}

#[test]
fn test_profile_from_config_drives_dispatch() {
    init_logging();

    let config = HookRegsConfig::from_toml_str(
        r#"
[[profile]]
name = "fastcall"
registers = ["ecx", "edx", "eax"]
"#,
    )
    .unwrap();
    let profile = config.profile("fastcall").unwrap();

    let mut ctx = CapturedContext {
        ecx: 3,
        edx: 4,
        ..Default::default()
    };

    let released = dispatch(profile, &mut ctx, |bank| {
        let sum = bank.read::<u32>(Register::Ecx).unwrap() + bank.read::<u32>(Register::Edx).unwrap();
        bank.write(Register::Eax, sum).unwrap();
    });

    assert_eq!(released, 3);
    assert_eq!(ctx.eax, 7);
}

// ============================================================================
// Pointer Arguments
// ============================================================================

#[cfg(test)]
mod pointer_arguments {
    use super::*;

    #[repr(C)]
    struct Argument {
        id: u32,
        flags: u32,
        value: u64,
    }

    /// A register holding an address reads through to the sentinel.
    #[test]
    fn test_read_sentinel_through_register() {
        let sentinel: u64 = 0x0123_4567_89AB_CDEF;
        let mut bank = RegisterBank::new([Register::Mm0]).unwrap();

        let slot = bank.slot_mut(Register::Mm0).unwrap();
        slot.write(std::ptr::from_ref(&sentinel).expose_provenance() as u64)
            .unwrap();

        let value = unsafe { slot.read_as_pointer::<u64>(0) };
        assert_eq!(value, sentinel);
    }

    /// Fields of a struct argument are reached with byte offsets.
    #[test]
    fn test_patch_struct_field_through_register() {
        let mut arg = Argument {
            id: 9,
            flags: 0,
            value: 100,
        };
        let mut bank = RegisterBank::new([Register::Mm1]).unwrap();

        let slot = bank.slot_mut(Register::Mm1).unwrap();
        slot.write(std::ptr::from_mut(&mut arg).expose_provenance() as u64)
            .unwrap();

        unsafe {
            assert_eq!(slot.read_as_pointer::<u32>(0), 9);
            slot.write_as_pointer(0x5u32, 4);
            slot.write_as_pointer(250u64, 8);
        }

        assert_eq!(arg.id, 9);
        assert_eq!(arg.flags, 0x5);
        assert_eq!(arg.value, 250);
    }
}
