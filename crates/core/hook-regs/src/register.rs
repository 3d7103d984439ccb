//! Register identities and their width classes
//!
//! Every x86 register a hook can observe is named by a [`Register`]. Each
//! register belongs to exactly one [`RegisterClass`], and the class fixes the
//! canonical byte width of the register's value through [`RegisterSize`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;

/// Operand sizes understood by the register context, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum RegisterSize {
    Byte = 1,
    Word = 2,
    Dword = 4,
    Qword = 8,
    /// 80-bit extended precision
    Tword = 10,
    Xmmword = 16,
    Ymmword = 32,
    Zmmword = 64,
}

impl RegisterSize {
    pub const fn bytes(self) -> usize {
        self as usize
    }

    pub const fn bits(self) -> usize {
        self.bytes() * 8
    }

    /// Map a byte count back to an operand size, `None` for widths no
    /// register uses.
    pub const fn from_bytes(bytes: usize) -> Option<Self> {
        match bytes {
            1 => Some(Self::Byte),
            2 => Some(Self::Word),
            4 => Some(Self::Dword),
            8 => Some(Self::Qword),
            10 => Some(Self::Tword),
            16 => Some(Self::Xmmword),
            32 => Some(Self::Ymmword),
            64 => Some(Self::Zmmword),
            _ => None,
        }
    }
}

/// Width/category grouping of registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterClass {
    /// 8-bit general purpose
    Gp8,
    /// 16-bit general purpose
    Gp16,
    /// 32-bit general purpose
    Gp32,
    /// 64-bit MMX
    Mmx,
    /// 128-bit SSE
    Xmm,
    /// 16-bit segment selectors
    Segment,
    /// 80-bit x87 stack
    X87,
}

impl RegisterClass {
    /// Canonical value width for every register of this class.
    pub const fn size(self) -> RegisterSize {
        match self {
            RegisterClass::Gp8 => RegisterSize::Byte,
            RegisterClass::Gp16 | RegisterClass::Segment => RegisterSize::Word,
            RegisterClass::Gp32 => RegisterSize::Dword,
            RegisterClass::Mmx => RegisterSize::Qword,
            RegisterClass::Xmm => RegisterSize::Xmmword,
            RegisterClass::X87 => RegisterSize::Tword,
        }
    }
}

/// An architectural x86 register
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Register {
    // 8-bit general purpose
    Al,
    Cl,
    Dl,
    Bl,
    Ah,
    Ch,
    Dh,
    Bh,

    // 16-bit general purpose
    Ax,
    Cx,
    Dx,
    Bx,
    Sp,
    Bp,
    Si,
    Di,

    // 32-bit general purpose
    Eax,
    Ecx,
    Edx,
    Ebx,
    Esp,
    Ebp,
    Esi,
    Edi,

    // 64-bit MMX
    Mm0,
    Mm1,
    Mm2,
    Mm3,
    Mm4,
    Mm5,
    Mm6,
    Mm7,

    // 128-bit XMM
    Xmm0,
    Xmm1,
    Xmm2,
    Xmm3,
    Xmm4,
    Xmm5,
    Xmm6,
    Xmm7,

    // 16-bit segment
    Cs,
    Ss,
    Ds,
    Es,
    Fs,
    Gs,

    // 80-bit x87
    St0,
    St1,
    St2,
    St3,
    St4,
    St5,
    St6,
    St7,
}

const_assert_eq!(Register::ALL.len(), Register::COUNT);
const_assert_eq!(Register::St7 as usize + 1, Register::COUNT);

impl Register {
    pub const COUNT: usize = 54;

    /// Every register in declaration order; `ALL[r.index()] == r`.
    pub const ALL: [Register; Register::COUNT] = [
        Register::Al,
        Register::Cl,
        Register::Dl,
        Register::Bl,
        Register::Ah,
        Register::Ch,
        Register::Dh,
        Register::Bh,
        Register::Ax,
        Register::Cx,
        Register::Dx,
        Register::Bx,
        Register::Sp,
        Register::Bp,
        Register::Si,
        Register::Di,
        Register::Eax,
        Register::Ecx,
        Register::Edx,
        Register::Ebx,
        Register::Esp,
        Register::Ebp,
        Register::Esi,
        Register::Edi,
        Register::Mm0,
        Register::Mm1,
        Register::Mm2,
        Register::Mm3,
        Register::Mm4,
        Register::Mm5,
        Register::Mm6,
        Register::Mm7,
        Register::Xmm0,
        Register::Xmm1,
        Register::Xmm2,
        Register::Xmm3,
        Register::Xmm4,
        Register::Xmm5,
        Register::Xmm6,
        Register::Xmm7,
        Register::Cs,
        Register::Ss,
        Register::Ds,
        Register::Es,
        Register::Fs,
        Register::Gs,
        Register::St0,
        Register::St1,
        Register::St2,
        Register::St3,
        Register::St4,
        Register::St5,
        Register::St6,
        Register::St7,
    ];

    const NAMES: [&str; Register::COUNT] = [
        "al", "cl", "dl", "bl", "ah", "ch", "dh", "bh", //
        "ax", "cx", "dx", "bx", "sp", "bp", "si", "di", //
        "eax", "ecx", "edx", "ebx", "esp", "ebp", "esi", "edi", //
        "mm0", "mm1", "mm2", "mm3", "mm4", "mm5", "mm6", "mm7", //
        "xmm0", "xmm1", "xmm2", "xmm3", "xmm4", "xmm5", "xmm6", "xmm7", //
        "cs", "ss", "ds", "es", "fs", "gs", //
        "st0", "st1", "st2", "st3", "st4", "st5", "st6", "st7",
    ];

    /// Dense index in `0..Register::COUNT`.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub const fn name(self) -> &'static str {
        Self::NAMES[self.index()]
    }

    pub const fn class(self) -> RegisterClass {
        use Register::*;
        match self {
            Al | Cl | Dl | Bl | Ah | Ch | Dh | Bh => RegisterClass::Gp8,
            Ax | Cx | Dx | Bx | Sp | Bp | Si | Di => RegisterClass::Gp16,
            Eax | Ecx | Edx | Ebx | Esp | Ebp | Esi | Edi => RegisterClass::Gp32,
            Mm0 | Mm1 | Mm2 | Mm3 | Mm4 | Mm5 | Mm6 | Mm7 => RegisterClass::Mmx,
            Xmm0 | Xmm1 | Xmm2 | Xmm3 | Xmm4 | Xmm5 | Xmm6 | Xmm7 => RegisterClass::Xmm,
            Cs | Ss | Ds | Es | Fs | Gs => RegisterClass::Segment,
            St0 | St1 | St2 | St3 | St4 | St5 | St6 | St7 => RegisterClass::X87,
        }
    }

    pub const fn size(self) -> RegisterSize {
        self.class().size()
    }

    /// Registers of `class` in declaration order.
    pub fn iter_class(class: RegisterClass) -> impl Iterator<Item = Register> {
        Self::ALL.into_iter().filter(move |reg| reg.class() == class)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a register name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown register name: {0}")]
pub struct UnknownRegister(pub String);

impl FromStr for Register {
    type Err = UnknownRegister;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|reg| reg.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownRegister(s.to_string()))
    }
}
