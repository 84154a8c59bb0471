//! Module-ready handshake
//!
//! While a display module has no response pending it clocks out a fixed
//! signature. The host polls until the signature shows up in its receive
//! buffer.

/// Bytes at offset 0 of a ready module's output
pub const MODULE_SIGNATURE: [u8; 13] = [
    0x80, b'[', b'c', b'a', b'n', b'v', b'a', b's', b'l', b'i', b'n', b'k', b']',
];

/// Offset of the module identifier byte
pub const MODULE_IDENTIFIER_OFFSET: usize = 17;

/// Identifier of the 2.8" touch display module
pub const MODULE_IDENTIFIER: u8 = 54;

/// Length of the ready announcement
pub const READY_FRAME_LEN: usize = MODULE_IDENTIFIER_OFFSET + 1;

/// The announcement a ready module transmits
///
/// Bytes between the signature and the identifier are reserved and zero.
pub fn ready_frame() -> [u8; READY_FRAME_LEN] {
    let mut frame = [0u8; READY_FRAME_LEN];
    frame[..MODULE_SIGNATURE.len()].copy_from_slice(&MODULE_SIGNATURE);
    frame[MODULE_IDENTIFIER_OFFSET] = MODULE_IDENTIFIER;
    frame
}

/// Whether `rx` starts with a ready announcement
pub fn is_module_ready(rx: &[u8]) -> bool {
    rx.len() >= READY_FRAME_LEN
        && rx[..MODULE_SIGNATURE.len()] == MODULE_SIGNATURE
        && rx[MODULE_IDENTIFIER_OFFSET] == MODULE_IDENTIFIER
}
