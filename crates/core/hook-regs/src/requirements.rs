//! Register requirements of a calling convention
//!
//! The calling-convention descriptor decides which registers carry which
//! arguments; this crate only needs the resulting set to build a bank.

use serde::{Deserialize, Serialize};

use crate::register::Register;

/// Anything that can name the registers a hooked call needs
pub trait RegisterRequirements {
    /// Registers to materialize. Duplicates are allowed.
    fn required_registers(&self) -> Vec<Register>;
}

impl RegisterRequirements for [Register] {
    fn required_registers(&self) -> Vec<Register> {
        self.to_vec()
    }
}

impl<const N: usize> RegisterRequirements for [Register; N] {
    fn required_registers(&self) -> Vec<Register> {
        self.to_vec()
    }
}

impl RegisterRequirements for Vec<Register> {
    fn required_registers(&self) -> Vec<Register> {
        self.clone()
    }
}

/// Named register set, usually loaded from configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterProfile {
    pub name: String,
    pub registers: Vec<Register>,
}

impl RegisterProfile {
    pub fn new(name: impl Into<String>, registers: impl IntoIterator<Item = Register>) -> Self {
        Self {
            name: name.into(),
            registers: registers.into_iter().collect(),
        }
    }
}

impl RegisterRequirements for RegisterProfile {
    fn required_registers(&self) -> Vec<Register> {
        self.registers.clone()
    }
}
