//! Core display operations

use embedded_hal::delay::DelayNs;

use crate::charset::validate_character;
use crate::command::{
    CLEAR_DISPLAY, CURSOR_DIR_DECREMENT, CURSOR_DIR_INCREMENT, CURSOR_FONT_BLOCK,
    CURSOR_FONT_UNDERLINE, CURSOR_HOME, CURSOR_OFF, CURSOR_ON, CURSOR_RETURN,
    CURSOR_STEP_BACKWARD, CURSOR_STEP_FORWARD, DISPLAY_OFF, DISPLAY_ON, SUPPRESS_OFF, SUPPRESS_ON,
    SYS_RESET, UNDERLINE_BLINK_OFF, UNDERLINE_BLINK_ON, cursor_address,
};
use crate::interface::{DisplayInterface, SETTLE_US};

type DisplayResult<I> = core::result::Result<(), <I as DisplayInterface>::Error>;

/// Milliseconds the controller is given to boot before the first command
pub const BOOT_DELAY_MS: u32 = 50;

/// Default cap on the number of bytes [`Display::write_bytes`] will send
pub const DEFAULT_WRITE_LIMIT: usize = 255;

/// Direction the cursor auto-advances after each character write
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CursorDirection {
    /// The cursor moves one place right after a write
    Increment,
    /// The cursor moves one place left after a write
    Decrement,
}

/// Driver for an EA-X controller
///
/// Provides one operation per controller command on top of any
/// [`DisplayInterface`]. The driver keeps no mirror of controller state:
/// settings latched on the chip (cursor style and visibility, advance
/// direction, suppression) are whatever the caller last set them to.
///
/// Text is not wrapped onto the second line automatically; position output
/// with [`set_cursor_pos`](Self::set_cursor_pos).
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new display driver from the given hardware interface
    pub fn new(interface: I) -> Self {
        Self { interface }
    }

    /// Bring the controller to a known state and switch the display on
    ///
    /// Drives every line to its idle level, gives the panel
    /// [`BOOT_DELAY_MS`] to boot, then sends the display-on command. Call
    /// once during setup.
    ///
    /// Idling the lines also stops the clock, so call
    /// [`enable_clock`](Self::enable_clock) after this, not before.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.interface.set_idle()?;
        delay.delay_ms(BOOT_DELAY_MS);
        self.display_on(delay)?;
        log::debug!("ea-x: init done, display on");
        Ok(())
    }

    /// Start the clock signal for the controller logic
    pub fn enable_clock(&mut self) -> DisplayResult<I> {
        self.interface.enable_clock()
    }

    /// Stop the clock signal
    pub fn disable_clock(&mut self) -> DisplayResult<I> {
        self.interface.disable_clock()
    }

    /// Trigger a hardware reset of the LCD
    ///
    /// Pulses the reset line. The controller comes back with the display
    /// switched off.
    pub fn hard_reset<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        log::debug!("ea-x: hard reset");
        self.interface.hard_reset(delay)
    }

    /// Reset the controller logic without touching the reset line
    ///
    /// The display comes back switched off, as after power-on.
    pub fn soft_reset<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.send_command(SYS_RESET, delay)
    }

    /// Set the cursor position by column and line
    ///
    /// Both are 0-based. Out-of-range values are masked into range rather
    /// than rejected; see [`cursor_address`].
    pub fn set_cursor_pos<D: DelayNs>(
        &mut self,
        column: u8,
        line: u8,
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.send_command(cursor_address(column, line), delay)
    }

    /// Clear the display contents and return the cursor to home
    ///
    /// Leaves every other setting (cursor style, direction, suppression)
    /// as it was; this is not a reset.
    pub fn clear_display<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.send_command(CLEAR_DISPLAY, delay)
    }

    /// Move the cursor back to the first cell of the first line
    pub fn move_cursor_home<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.send_command(CURSOR_HOME, delay)
    }

    /// Move the cursor back to the first cell of the current line
    pub fn return_cursor<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.send_command(CURSOR_RETURN, delay)
    }

    /// Set the direction the cursor auto-advances after each write
    pub fn set_cursor_dir<D: DelayNs>(
        &mut self,
        direction: CursorDirection,
        delay: &mut D,
    ) -> DisplayResult<I> {
        let code = match direction {
            CursorDirection::Increment => CURSOR_DIR_INCREMENT,
            CursorDirection::Decrement => CURSOR_DIR_DECREMENT,
        };
        self.send_command(code, delay)
    }

    /// Move the cursor the given number of places, right for positive
    /// distances and left for negative ones
    ///
    /// The controller only knows single steps, so this issues one step
    /// command per place.
    pub fn move_cursor<D: DelayNs>(&mut self, distance: i32, delay: &mut D) -> DisplayResult<I> {
        let step = if distance > 0 {
            CURSOR_STEP_FORWARD
        } else {
            CURSOR_STEP_BACKWARD
        };
        for _ in 0..distance.unsigned_abs() {
            self.send_command(step, delay)?;
        }
        Ok(())
    }

    /// Use a blinking block as the cursor glyph
    ///
    /// Does not make a hidden cursor visible; see
    /// [`show_cursor`](Self::show_cursor).
    pub fn use_block_cursor<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.send_command(CURSOR_FONT_BLOCK, delay)
    }

    /// Use an underline as the cursor glyph, steady or blinking
    ///
    /// Does not make a hidden cursor visible; see
    /// [`show_cursor`](Self::show_cursor).
    pub fn use_underline_cursor<D: DelayNs>(
        &mut self,
        blinking: bool,
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.send_command(CURSOR_FONT_UNDERLINE, delay)?;
        let code = if blinking {
            UNDERLINE_BLINK_ON
        } else {
            UNDERLINE_BLINK_OFF
        };
        self.send_command(code, delay)
    }

    /// Make the cursor visible
    pub fn show_cursor<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.send_command(CURSOR_ON, delay)
    }

    /// Hide the cursor
    ///
    /// Glyph and blink settings stay latched and apply again when the
    /// cursor is shown.
    pub fn hide_cursor<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.send_command(CURSOR_OFF, delay)
    }

    /// Switch the display on
    ///
    /// The display is always off after power-on and after either kind of
    /// reset.
    pub fn display_on<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.send_command(DISPLAY_ON, delay)
    }

    /// Switch the display off
    ///
    /// Display memory is kept; switching back on restores the output.
    pub fn display_off<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.send_command(DISPLAY_OFF, delay)
    }

    /// Blank the output without touching display memory
    ///
    /// Only has an effect on panels run in one-line mode.
    pub fn suppress_display<D: DelayNs>(
        &mut self,
        suppress: bool,
        delay: &mut D,
    ) -> DisplayResult<I> {
        let code = if suppress { SUPPRESS_ON } else { SUPPRESS_OFF };
        self.send_command(code, delay)
    }

    /// Write one character at the cursor position
    ///
    /// Codes outside the glyph ROM are replaced with a space, see
    /// [`validate_character`]. The cursor auto-advances in the direction
    /// set by [`set_cursor_dir`](Self::set_cursor_dir).
    pub fn write_char<D: DelayNs>(&mut self, character: u8, delay: &mut D) -> DisplayResult<I> {
        self.interface
            .send_character(validate_character(character), delay)?;
        // Character writes want one extra settle before the next transfer.
        delay.delay_us(SETTLE_US);
        Ok(())
    }

    /// Write a byte string, stopping at the first NUL
    ///
    /// At most [`DEFAULT_WRITE_LIMIT`] bytes are sent; use
    /// [`write_bytes_limited`](Self::write_bytes_limited) for a different
    /// cap.
    pub fn write_bytes<D: DelayNs>(&mut self, text: &[u8], delay: &mut D) -> DisplayResult<I> {
        self.write_bytes_limited(text, DEFAULT_WRITE_LIMIT, delay)
    }

    /// Write a byte string, stopping at the first NUL or after `limit`
    /// bytes, whichever comes first
    pub fn write_bytes_limited<D: DelayNs>(
        &mut self,
        text: &[u8],
        limit: usize,
        delay: &mut D,
    ) -> DisplayResult<I> {
        for &character in text.iter().take(limit) {
            if character == 0 {
                break;
            }
            self.write_char(character, delay)?;
        }
        Ok(())
    }

    /// Write every byte of a string
    ///
    /// Unlike [`write_bytes`](Self::write_bytes) there is no length cap and
    /// NUL does not terminate; it prints as a space like any other
    /// unprintable code. The string's UTF-8 bytes go out one per character
    /// cell, the glyph ROM is not Unicode aware.
    pub fn write_str<D: DelayNs>(&mut self, text: &str, delay: &mut D) -> DisplayResult<I> {
        for &character in text.as_bytes() {
            self.write_char(character, delay)?;
        }
        Ok(())
    }

    /// Send a raw instruction byte to the controller
    ///
    /// Escape hatch for codes not covered by the operations above; see
    /// [`crate::command`] for the known ones.
    pub fn send_raw_instruction<D: DelayNs>(
        &mut self,
        code: u8,
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.send_command(code, delay)
    }

    /// Send a command byte over the interface
    ///
    /// The readiness verdict is dropped here: a timed-out busy poll has
    /// already been logged by the interface and the operation carries on
    /// regardless.
    fn send_command<D: DelayNs>(&mut self, command: u8, delay: &mut D) -> DisplayResult<I> {
        self.interface.send_instruction(command, delay)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Transfer {
        Instruction(u8),
        Character(u8),
        Idle,
        Reset,
        ClockOn,
        ClockOff,
    }

    #[derive(Debug)]
    struct MockInterface {
        instructions: alloc::vec::Vec<u8>,
        characters: alloc::vec::Vec<u8>,
        transfers: alloc::vec::Vec<Transfer>,
        /// Verdict every transfer reports back, true meaning ready
        busy_result: bool,
    }

    impl MockInterface {
        fn new() -> Self {
            Self {
                instructions: alloc::vec::Vec::new(),
                characters: alloc::vec::Vec::new(),
                transfers: alloc::vec::Vec::new(),
                busy_result: true,
            }
        }
    }

    impl DisplayInterface for MockInterface {
        type Error = Infallible;

        fn send_instruction<D: DelayNs>(
            &mut self,
            code: u8,
            _delay: &mut D,
        ) -> Result<bool, Self::Error> {
            self.instructions.push(code);
            self.transfers.push(Transfer::Instruction(code));
            Ok(self.busy_result)
        }

        fn send_character<D: DelayNs>(
            &mut self,
            character: u8,
            _delay: &mut D,
        ) -> Result<bool, Self::Error> {
            self.characters.push(character);
            self.transfers.push(Transfer::Character(character));
            Ok(self.busy_result)
        }

        fn set_idle(&mut self) -> Result<(), Self::Error> {
            self.transfers.push(Transfer::Idle);
            Ok(())
        }

        fn hard_reset<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
            self.transfers.push(Transfer::Reset);
            Ok(())
        }

        fn enable_clock(&mut self) -> Result<(), Self::Error> {
            self.transfers.push(Transfer::ClockOn);
            Ok(())
        }

        fn disable_clock(&mut self) -> Result<(), Self::Error> {
            self.transfers.push(Transfer::ClockOff);
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct MockDelay {
        us: alloc::vec::Vec<u32>,
        ms: alloc::vec::Vec<u32>,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_us(&mut self, us: u32) {
            self.us.push(us);
        }

        fn delay_ms(&mut self, ms: u32) {
            self.ms.push(ms);
        }
    }

    fn test_display() -> Display<MockInterface> {
        Display::new(MockInterface::new())
    }

    #[test]
    fn test_init_idles_boots_then_switches_on() {
        let mut display = test_display();
        let mut delay = MockDelay::default();

        assert!(display.init(&mut delay).is_ok());
        assert_eq!(
            display.interface.transfers,
            alloc::vec![Transfer::Idle, Transfer::Instruction(DISPLAY_ON)]
        );
        assert_eq!(delay.ms, alloc::vec![BOOT_DELAY_MS]);
    }

    #[test]
    fn test_hard_reset_delegates() {
        let mut display = test_display();
        let mut delay = MockDelay::default();

        assert!(display.hard_reset(&mut delay).is_ok());
        assert_eq!(display.interface.transfers, alloc::vec![Transfer::Reset]);
    }

    #[test]
    fn test_soft_reset_sends_system_reset() {
        let mut display = test_display();
        let mut delay = MockDelay::default();

        assert!(display.soft_reset(&mut delay).is_ok());
        assert_eq!(display.interface.instructions, alloc::vec![SYS_RESET]);
    }

    #[test]
    fn test_clock_ops_delegate() {
        let mut display = test_display();

        assert!(display.enable_clock().is_ok());
        assert!(display.disable_clock().is_ok());
        assert_eq!(
            display.interface.transfers,
            alloc::vec![Transfer::ClockOn, Transfer::ClockOff]
        );
    }

    #[test]
    fn test_set_cursor_pos_builds_address_byte() {
        let mut display = test_display();
        let mut delay = MockDelay::default();

        // In-range and out-of-range positions; the latter are masked.
        let positions = [(0, 0), (5, 1), (63, 0), (64, 2), (200, 7), (255, 255)];
        for (column, line) in positions {
            assert!(display.set_cursor_pos(column, line, &mut delay).is_ok());
        }

        for (sent, (column, line)) in display.interface.instructions.iter().zip(positions) {
            let expected = 0x80 | ((line & 1) << 6) | (column & 0x3F);
            assert_eq!(*sent, expected);
        }
        assert_eq!(display.interface.instructions[0], 0x80);
        assert_eq!(display.interface.instructions[1], 0xC5);
    }

    #[test]
    fn test_clear_display() {
        let mut display = test_display();
        let mut delay = MockDelay::default();

        assert!(display.clear_display(&mut delay).is_ok());
        assert_eq!(display.interface.instructions, alloc::vec![CLEAR_DISPLAY]);
    }

    #[test]
    fn test_cursor_home_and_return() {
        let mut display = test_display();
        let mut delay = MockDelay::default();

        assert!(display.move_cursor_home(&mut delay).is_ok());
        assert!(display.return_cursor(&mut delay).is_ok());
        assert_eq!(
            display.interface.instructions,
            alloc::vec![CURSOR_HOME, CURSOR_RETURN]
        );
    }

    #[test]
    fn test_set_cursor_dir() {
        let mut display = test_display();
        let mut delay = MockDelay::default();

        assert!(
            display
                .set_cursor_dir(CursorDirection::Increment, &mut delay)
                .is_ok()
        );
        assert!(
            display
                .set_cursor_dir(CursorDirection::Decrement, &mut delay)
                .is_ok()
        );
        assert_eq!(
            display.interface.instructions,
            alloc::vec![CURSOR_DIR_INCREMENT, CURSOR_DIR_DECREMENT]
        );
    }

    #[test]
    fn test_move_cursor_steps_one_place_at_a_time() {
        let mut display = test_display();
        let mut delay = MockDelay::default();

        assert!(display.move_cursor(3, &mut delay).is_ok());
        assert_eq!(
            display.interface.instructions,
            alloc::vec![CURSOR_STEP_FORWARD; 3]
        );

        display.interface.instructions.clear();
        assert!(display.move_cursor(-2, &mut delay).is_ok());
        assert_eq!(
            display.interface.instructions,
            alloc::vec![CURSOR_STEP_BACKWARD; 2]
        );

        display.interface.instructions.clear();
        assert!(display.move_cursor(0, &mut delay).is_ok());
        assert!(display.interface.instructions.is_empty());
    }

    #[test]
    fn test_cursor_font_commands() {
        let mut display = test_display();
        let mut delay = MockDelay::default();

        assert!(display.use_block_cursor(&mut delay).is_ok());
        assert_eq!(
            display.interface.instructions,
            alloc::vec![CURSOR_FONT_BLOCK]
        );

        // The underline glyph is selected before its blink mode.
        display.interface.instructions.clear();
        assert!(display.use_underline_cursor(true, &mut delay).is_ok());
        assert_eq!(
            display.interface.instructions,
            alloc::vec![CURSOR_FONT_UNDERLINE, UNDERLINE_BLINK_ON]
        );

        display.interface.instructions.clear();
        assert!(display.use_underline_cursor(false, &mut delay).is_ok());
        assert_eq!(
            display.interface.instructions,
            alloc::vec![CURSOR_FONT_UNDERLINE, UNDERLINE_BLINK_OFF]
        );
    }

    #[test]
    fn test_cursor_visibility() {
        let mut display = test_display();
        let mut delay = MockDelay::default();

        assert!(display.show_cursor(&mut delay).is_ok());
        assert!(display.hide_cursor(&mut delay).is_ok());
        assert_eq!(
            display.interface.instructions,
            alloc::vec![CURSOR_ON, CURSOR_OFF]
        );
    }

    #[test]
    fn test_display_on_off() {
        let mut display = test_display();
        let mut delay = MockDelay::default();

        assert!(display.display_on(&mut delay).is_ok());
        assert!(display.display_off(&mut delay).is_ok());
        assert_eq!(
            display.interface.instructions,
            alloc::vec![DISPLAY_ON, DISPLAY_OFF]
        );
    }

    #[test]
    fn test_suppress_display() {
        let mut display = test_display();
        let mut delay = MockDelay::default();

        assert!(display.suppress_display(true, &mut delay).is_ok());
        assert!(display.suppress_display(false, &mut delay).is_ok());
        assert_eq!(
            display.interface.instructions,
            alloc::vec![SUPPRESS_ON, SUPPRESS_OFF]
        );
    }

    #[test]
    fn test_write_char_validates_and_settles() {
        let mut display = test_display();
        let mut delay = MockDelay::default();

        assert!(display.write_char(b'a', &mut delay).is_ok());
        assert!(display.write_char(0x07, &mut delay).is_ok());

        // The bell code is not printable and goes out as a space.
        assert_eq!(display.interface.characters, alloc::vec![0x61, 0x20]);
        assert_eq!(delay.us, alloc::vec![SETTLE_US, SETTLE_US]);
    }

    #[test]
    fn test_write_bytes_stops_at_nul() {
        let mut display = test_display();
        let mut delay = MockDelay::default();

        assert!(display.write_bytes(b"AB\0CD", &mut delay).is_ok());
        assert_eq!(display.interface.characters, alloc::vec![b'A', b'B']);
    }

    #[test]
    fn test_write_bytes_limited_caps_output() {
        let mut display = test_display();
        let mut delay = MockDelay::default();

        assert!(display.write_bytes_limited(b"ABCDE", 3, &mut delay).is_ok());
        assert_eq!(display.interface.characters, alloc::vec![b'A', b'B', b'C']);

        // The NUL stop applies inside the cap as well.
        display.interface.characters.clear();
        assert!(
            display
                .write_bytes_limited(b"AB\0CD", 5, &mut delay)
                .is_ok()
        );
        assert_eq!(display.interface.characters, alloc::vec![b'A', b'B']);
    }

    #[test]
    fn test_write_bytes_default_limit() {
        let mut display = test_display();
        let mut delay = MockDelay::default();

        let text = alloc::vec![b'x'; 300];
        assert!(display.write_bytes(&text, &mut delay).is_ok());
        assert_eq!(display.interface.characters.len(), DEFAULT_WRITE_LIMIT);
    }

    #[test]
    fn test_write_str_sends_every_byte() {
        let mut display = test_display();
        let mut delay = MockDelay::default();

        assert!(display.write_str("A\0B", &mut delay).is_ok());
        assert_eq!(display.interface.characters, alloc::vec![0x41, 0x20, 0x42]);
    }

    #[test]
    fn test_send_raw_instruction() {
        let mut display = test_display();
        let mut delay = MockDelay::default();

        assert!(display.send_raw_instruction(0x42, &mut delay).is_ok());
        assert_eq!(display.interface.instructions, alloc::vec![0x42]);
    }

    #[test]
    fn test_operations_proceed_after_busy_timeout() {
        let mut display = test_display();
        display.interface.busy_result = false;
        let mut delay = MockDelay::default();

        // A transfer whose readiness wait gave up is not an error.
        assert!(display.clear_display(&mut delay).is_ok());
        assert!(display.write_char(b'a', &mut delay).is_ok());
        assert_eq!(
            display.interface.transfers,
            alloc::vec![
                Transfer::Instruction(CLEAR_DISPLAY),
                Transfer::Character(b'a'),
            ]
        );
    }
}
