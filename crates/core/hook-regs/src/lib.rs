//! # Hook Register Context
//!
//! CPU register state captured around an intercepted function call.
//!
//! A hook dispatcher builds a [`RegisterBank`] holding only the registers the
//! hooked function's calling convention uses, copies the live CPU values into
//! it, lets the hook callback read and patch them, and copies them back before
//! the original function resumes.
//!
//! ## Modules
//!
//! - [`register`]: register identities, classes and widths
//! - [`slot`]: size-checked storage for one register value
//! - [`bank`]: the per-invocation register set
//! - [`requirements`]: register sets supplied by calling conventions
//! - [`config`]: TOML register profiles
//!
//! ```
//! use hook_regs::{Register, RegisterBank};
//!
//! let mut bank = RegisterBank::new([Register::Eax, Register::Xmm0])?;
//! bank.write(Register::Eax, 0xDEAD_BEEFu32)?;
//! assert_eq!(bank.read::<u32>(Register::Eax)?, 0xDEAD_BEEF);
//! assert!(bank.get(Register::Ecx).is_none());
//! # Ok::<(), hook_regs::RegisterError>(())
//! ```

pub mod bank;
pub mod config;
pub mod error;
pub mod register;
pub mod requirements;
pub mod slot;

// Re-exports for convenience
pub use bank::{BankStats, RegisterBank};
pub use config::HookRegsConfig;
pub use error::{ConfigError, RegisterError, Result};
pub use register::{Register, RegisterClass, RegisterSize, UnknownRegister};
pub use requirements::{RegisterProfile, RegisterRequirements};
pub use slot::RegisterSlot;
