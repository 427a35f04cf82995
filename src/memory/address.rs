// Mon Oct 12 2026 - Alex

use serde::Serialize;
use std::fmt;
use std::ops::{Add, Sub};

/// Host virtual address inside the attached emulator process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Address {
    value: u64,
}

impl Address {
    pub const fn new(value: u64) -> Self {
        Self { value }
    }

    pub const fn zero() -> Self {
        Self { value: 0 }
    }

    pub fn as_u64(&self) -> u64 {
        self.value
    }

    pub fn is_null(&self) -> bool {
        self.value == 0
    }

    pub fn offset(&self, offset: u64) -> Self {
        Self { value: self.value.wrapping_add(offset) }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.value)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value, f)
    }
}

impl fmt::UpperHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.value, f)
    }
}

// Emulator offsets such as RMG's 0x80000000 rely on wrapping.
impl Add<u64> for Address {
    type Output = Self;
    fn add(self, rhs: u64) -> Self::Output {
        self.offset(rhs)
    }
}

impl Sub<Address> for Address {
    type Output = u64;
    fn sub(self, rhs: Address) -> Self::Output {
        self.value.wrapping_sub(rhs.value)
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl From<Address> for u64 {
    fn from(addr: Address) -> Self {
        addr.value
    }
}
