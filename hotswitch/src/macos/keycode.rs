//! macOS virtual key codes used by the switcher.

pub const TAB: u16 = 0x30;
pub const SPACE: u16 = 0x31;
pub const RETURN: u16 = 0x24;
pub const ESCAPE: u16 = 0x35;
pub const LEFT: u16 = 0x7B;
pub const RIGHT: u16 = 0x7C;
pub const DOWN: u16 = 0x7D;
pub const UP: u16 = 0x7E;

pub fn key_code_to_str(code: u16) -> &'static str {
    match code {
        TAB => "tab",
        SPACE => "space",
        RETURN => "return",
        ESCAPE => "escape",
        LEFT => "left",
        RIGHT => "right",
        DOWN => "down",
        UP => "up",
        _ => "other",
    }
}
