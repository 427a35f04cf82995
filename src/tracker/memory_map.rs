// Fri Oct 16 2026 - Alex

//! Fixed DK64 (US) guest addresses.

/// Main memory pointer, read once after connecting.
pub const MEMORY_POINTER: u32 = 0x807F_C8A0;
/// Holds the address of the count struct; its first byte reads 0x80 once populated.
pub const COUNT_STRUCT_POINTER: u32 = 0x807F_FFB8;
pub const COUNT_STRUCT_POPULATED: u8 = 0x80;

pub const MAP_INDEX: u32 = 0x8074_44E4;
pub const GAME_MODE: u32 = 0x8075_5318;
/// Items only hold meaningful values while the game is in this mode.
pub const GAME_MODE_PLAYING: u8 = 6;

pub const KONG_BASE: u32 = 0x807F_C950;
pub const KONG_STRIDE: u32 = 0x5E;
pub const FLAG_BLOCK: u32 = 0x807E_CEA8;

pub fn kong_base(kong: u8) -> u32 {
    KONG_BASE + KONG_STRIDE * kong as u32
}

/// Byte address and bit of a permanent flag.
pub fn flag_location(index: u16) -> (u32, u8) {
    (FLAG_BLOCK + (index >> 3) as u32, (index & 7) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kong_base_stride() {
        assert_eq!(kong_base(0), 0x807F_C950);
        assert_eq!(kong_base(4), 0x807F_C950 + 4 * 0x5E);
    }

    #[test]
    fn test_flag_location() {
        assert_eq!(flag_location(0x29F), (0x807E_CEA8 + 0x53, 7));
        assert_eq!(flag_location(0x3C2), (0x807E_CEA8 + 0x78, 2));
    }
}
