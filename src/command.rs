//! EA-X command definitions
//!
//! This module defines the command bytes understood by the EA-X controller.
//! Every command is a single byte, written in instruction mode (data-select
//! line low); bytes written in character mode go to the display memory
//! instead.
//!
//! ## Command Structure
//!
//! All commands follow the pattern:
//! 1. Drive the data-select line low (instruction mode)
//! 2. Present the byte on D0-D7
//! 3. Strobe the write-enable line (active low)
//! 4. Poll the busy flag until the controller reports ready
//!
//! Plain commands keep bit 7 clear; a byte with bit 7 set is a cursor
//! address instead (see [`cursor_address`]).
//!
//! ## Example
//!
//! ```rust,no_run
//! use epson_eax::{command, DisplayInterface, ParallelBus};
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
//! # use embedded_hal::digital::{InputPin, OutputPin};
//! # use embedded_hal::pwm::SetDutyCycle;
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! # }
//! # struct MockClock;
//! # impl embedded_hal::pwm::ErrorType for MockClock { type Error = Infallible; }
//! # impl SetDutyCycle for MockClock {
//! #     fn max_duty_cycle(&self) -> u16 { 255 }
//! #     fn set_duty_cycle(&mut self, _duty: u16) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! # let mut bus = ParallelBus::new(
//! #     [MockPin, MockPin, MockPin, MockPin, MockPin, MockPin, MockPin, MockPin],
//! #     MockPin, MockClock, MockPin, MockPin, MockPin,
//! # );
//! // Clear the display and switch it on
//! let _ = bus.send_instruction(command::CLEAR_DISPLAY, &mut delay);
//! let _ = bus.send_instruction(command::DISPLAY_ON, &mut delay);
//!
//! // Jump to the third character of the second line
//! let _ = bus.send_instruction(command::cursor_address(2, 1), &mut delay);
//! ```

// System commands

/// Software reset (0x10)
///
/// Returns the controller logic to its power-on state. The display ends up
/// switched off and must be re-enabled with [`DISPLAY_ON`].
pub const SYS_RESET: u8 = 0x10;

/// Clear display (0x01)
///
/// Blanks the display memory and returns the cursor to the home position.
/// All other settings are left intact.
pub const CLEAR_DISPLAY: u8 = 0x01;

// Cursor movement

/// Cursor home (0x02)
///
/// Moves the cursor to the first character of the first line. Display
/// contents are untouched.
pub const CURSOR_HOME: u8 = 0x02;

/// Cursor return (0x03)
///
/// Moves the cursor to the first character of the current line.
pub const CURSOR_RETURN: u8 = 0x03;

/// Auto-advance direction: increment (0x04)
///
/// After each character write the cursor moves one place right.
pub const CURSOR_DIR_INCREMENT: u8 = 0x04;

/// Auto-advance direction: decrement (0x05)
///
/// After each character write the cursor moves one place left.
pub const CURSOR_DIR_DECREMENT: u8 = 0x05;

/// Step the cursor one place forward (0x06)
pub const CURSOR_STEP_FORWARD: u8 = 0x06;

/// Step the cursor one place backward (0x07)
pub const CURSOR_STEP_BACKWARD: u8 = 0x07;

// Cursor appearance

/// Underline cursor glyph (0x08)
pub const CURSOR_FONT_UNDERLINE: u8 = 0x08;

/// Blinking block cursor glyph (0x09)
pub const CURSOR_FONT_BLOCK: u8 = 0x09;

/// Underline cursor blink off (0x0A) - steady underline
pub const UNDERLINE_BLINK_OFF: u8 = 0x0A;

/// Underline cursor blink on (0x0B)
pub const UNDERLINE_BLINK_ON: u8 = 0x0B;

// Display state

/// Display off (0x0C)
///
/// Blanks the panel without clearing the display memory.
pub const DISPLAY_OFF: u8 = 0x0C;

/// Display on (0x0D)
///
/// The display is always off after power-on or a reset.
pub const DISPLAY_ON: u8 = 0x0D;

/// Cursor visibility off (0x0E)
///
/// The chosen cursor glyph and blink state stay latched while hidden.
pub const CURSOR_OFF: u8 = 0x0E;

/// Cursor visibility on (0x0F)
pub const CURSOR_ON: u8 = 0x0F;

/// Suppress output from the cursor position onwards (0x20)
///
/// Only affects single-line panels.
pub const SUPPRESS_ON: u8 = 0x20;

/// End output suppression (0x60)
pub const SUPPRESS_OFF: u8 = 0x60;

// Cursor addressing

/// Flag bit marking an instruction byte as a cursor address
///
/// Plain commands never have this bit set.
pub const CURSOR_ADDRESS_FLAG: u8 = 0x80;

/// Mask for the column bits of a cursor address
pub const CURSOR_COLUMN_MASK: u8 = 0x3F;

/// Build a cursor-positioning instruction byte
///
/// Both coordinates are 0-based: the first character of the first line is
/// `(0, 0)`. The column occupies bits 0-5 and the line bit 6, so columns
/// are masked to 6 bits and the line to 1 bit (exactly two lines exist).
/// Out-of-range values wrap rather than fail.
///
/// ## Example
///
/// ```
/// use epson_eax::command::cursor_address;
///
/// // First character of the first line
/// assert_eq!(cursor_address(0, 0), 0x80);
///
/// // Sixth character of the second line
/// assert_eq!(cursor_address(5, 1), 0xC5);
/// ```
pub fn cursor_address(column: u8, line: u8) -> u8 {
    CURSOR_ADDRESS_FLAG | ((line & 1) << 6) | (column & CURSOR_COLUMN_MASK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_address_origin() {
        assert_eq!(cursor_address(0, 0), 0x80);
    }

    #[test]
    fn test_cursor_address_second_line() {
        assert_eq!(cursor_address(0, 1), 0xC0);
        assert_eq!(cursor_address(39, 1), 0xC0 | 39);
    }

    #[test]
    fn test_cursor_address_masks_column_to_six_bits() {
        assert_eq!(cursor_address(0x7F, 0), 0x80 | 0x3F);
        assert_eq!(cursor_address(64, 0), 0x80);
    }

    #[test]
    fn test_cursor_address_masks_line_to_one_bit() {
        assert_eq!(cursor_address(3, 2), cursor_address(3, 0));
        assert_eq!(cursor_address(3, 3), cursor_address(3, 1));
    }

    #[test]
    fn test_commands_stay_clear_of_the_address_flag() {
        let commands = [
            SYS_RESET,
            CLEAR_DISPLAY,
            CURSOR_HOME,
            CURSOR_RETURN,
            CURSOR_DIR_INCREMENT,
            CURSOR_DIR_DECREMENT,
            CURSOR_STEP_FORWARD,
            CURSOR_STEP_BACKWARD,
            CURSOR_FONT_UNDERLINE,
            CURSOR_FONT_BLOCK,
            UNDERLINE_BLINK_OFF,
            UNDERLINE_BLINK_ON,
            DISPLAY_OFF,
            DISPLAY_ON,
            CURSOR_OFF,
            CURSOR_ON,
            SUPPRESS_ON,
            SUPPRESS_OFF,
        ];
        for cmd in commands {
            assert_eq!(cmd & CURSOR_ADDRESS_FLAG, 0, "command {cmd:#04x}");
        }
    }
}
