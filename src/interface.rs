//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`ParallelBus`]
//! struct for communicating with the EA-X controller over its bit-banged
//! 8-bit parallel bus.
//!
//! ## Hardware Requirements
//!
//! The EA-X is driven entirely through GPIO:
//! - 8 data lines:
//!   - **D0-D7**: the parallel bus, least significant bit on D0. These must
//!     be open-drain outputs with pull-ups that can also be read back,
//!     because D7 doubles as the controller's busy flag.
//! - 4 control lines (outputs):
//!   - **A0**: data select (low = instruction, high = character)
//!   - **WR**: write enable (active low)
//!   - **RD**: read enable (active low)
//!   - **RESET**: reset (active low)
//! - 1 clock line:
//!   - **ENB**: square-wave clock for the controller logic, nominally 2 MHz,
//!     modelled as a PWM channel running at 50 % duty
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::pwm::SetDutyCycle;
//! use epson_eax::{DisplayInterface, ParallelBus};
//! # use core::convert::Infallible;
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
//! // Create the bus with the data pins D0-D7 and the control pins
//! let mut bus = ParallelBus::new(
//!     [MockPin, MockPin, MockPin, MockPin, MockPin, MockPin, MockPin, MockPin],
//!     MockPin,   // A0
//!     MockClock, // ENB
//!     MockPin,   // WR
//!     MockPin,   // RD
//!     MockPin,   // RESET
//! );
//!
//! // Send a command
//! let _ = bus.send_instruction(0x01, &mut delay); // Clear display
//!
//! // Send a character
//! let _ = bus.send_character(b'A', &mut delay);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::pwm::SetDutyCycle;

use crate::error::InterfaceError;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// The two interpretations of a byte presented on the bus
///
/// Selected through the data-select line (A0). The selection latches on the
/// controller side and only changes when the other mode is selected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mode {
    /// The byte is a command for the controller (data-select low)
    Instruction,
    /// The byte is character data for the display memory (data-select high)
    Character,
}

/// Trait for hardware interface to an EA-X controller
///
/// This trait abstracts over different bus implementations, allowing the
/// [`Display`](crate::display::Display) to work with anything that can move
/// instruction and character bytes to the controller.
///
/// ## Implementing
///
/// For most cases, use the provided [`ParallelBus`] struct. If the bus is
/// reached some other way (an I/O expander, a shift register), implement
/// this trait on your own type.
pub trait DisplayInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Transfer one instruction byte to the controller
    ///
    /// The implementation must:
    /// 1. Select instruction mode (data-select low)
    /// 2. Present the byte on the bus and latch it with a write strobe
    /// 3. Poll the busy flag until the controller reports ready or the
    ///    poll gives up
    ///
    /// Returns whether the controller reported ready. A timed-out poll is
    /// not an error; the transfer may still have been accepted.
    fn send_instruction<D: DelayNs>(
        &mut self,
        code: u8,
        delay: &mut D,
    ) -> InterfaceResult<bool, Self::Error>;

    /// Transfer one character byte to the display memory
    ///
    /// Same sequence as [`send_instruction`](Self::send_instruction) with
    /// character mode selected instead (data-select high). The caller is
    /// expected to have validated the byte already, see [`crate::charset`].
    fn send_character<D: DelayNs>(
        &mut self,
        character: u8,
        delay: &mut D,
    ) -> InterfaceResult<bool, Self::Error>;

    /// Drive every line to its idle level
    ///
    /// Idle means: instruction mode selected, write and read enable
    /// deasserted (high), reset deasserted (high), data lines low, clock
    /// line held low.
    fn set_idle(&mut self) -> InterfaceResult<(), Self::Error>;

    /// Perform a hardware reset
    ///
    /// The implementation must pulse the reset line low and give the
    /// controller time to restart on both edges.
    ///
    /// # Arguments
    ///
    /// * `delay` - Delay implementation for timing
    fn hard_reset<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error>;

    /// Start the clock signal
    ///
    /// Interfaces without a controllable clock line can rely on the default
    /// no-op body.
    fn enable_clock(&mut self) -> InterfaceResult<(), Self::Error> {
        Ok(())
    }

    /// Stop the clock signal
    fn disable_clock(&mut self) -> InterfaceResult<(), Self::Error> {
        Ok(())
    }
}

/// Fixed settle delay in microseconds applied after changing a bus signal
///
/// Covers the controller's setup and hold timing for every line.
pub const SETTLE_US: u32 = 10;

/// Default timeout for the busy-flag poll in milliseconds
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 100;

/// Bit-banged parallel bus implementation for the EA-X
///
/// Implements [`DisplayInterface`] by sequencing the controller's write and
/// read timing on embedded-hal v1.0 GPIO. Every signal change is followed by
/// a fixed [`SETTLE_US`] settle delay.
///
/// The data pins must be wired open-drain with pull-ups: during the busy
/// poll D7 is released (driven high) so the controller can drive the line,
/// then sampled as an input; at all other times the data lines are actively
/// driven. embedded-hal has no runtime direction switching, so the
/// electrical setup has to provide it.
///
/// The ENB clock is a PWM channel: 50 % duty runs the square wave (the
/// channel should be configured for the controller's nominal 2 MHz), zero
/// duty holds the line low. The bus remembers whether it was the one to
/// start the clock and stops it on drop only in that case, leaving alone a
/// clock that another handle or the board itself is running.
///
/// ## Type Parameters
///
/// * `DATA` - Data bus pins D0-D7 ([`OutputPin`] + [`InputPin`])
/// * `CTRL` - Control pins A0, WR, RD and RESET ([`OutputPin`])
/// * `CLK` - ENB clock channel ([`SetDutyCycle`])
///
/// ## Example
///
/// ```rust,no_run
/// use embedded_hal::delay::DelayNs;
/// use embedded_hal::digital::{InputPin, OutputPin};
/// use embedded_hal::pwm::SetDutyCycle;
/// use epson_eax::{Mode, ParallelBus};
/// # use core::convert::Infallible;
/// # struct MockPin;
/// # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
/// # impl OutputPin for MockPin {
/// #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// # }
/// # impl InputPin for MockPin {
/// #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(false) }
/// #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(true) }
/// # }
/// # struct MockClock;
/// # impl embedded_hal::pwm::ErrorType for MockClock { type Error = Infallible; }
/// # impl SetDutyCycle for MockClock {
/// #     fn max_duty_cycle(&self) -> u16 { 255 }
/// #     fn set_duty_cycle(&mut self, _duty: u16) -> Result<(), Self::Error> { Ok(()) }
/// # }
/// # struct MockDelay;
/// # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
/// # let mut delay = MockDelay;
/// let mut bus = ParallelBus::new(
///     [MockPin, MockPin, MockPin, MockPin, MockPin, MockPin, MockPin, MockPin],
///     MockPin,   // A0
///     MockClock, // ENB
///     MockPin,   // WR
///     MockPin,   // RD
///     MockPin,   // RESET
/// );
///
/// // A slow panel may need a longer busy-poll budget
/// bus.set_busy_timeout(250);
///
/// // Raw transfer in an explicit mode
/// let _ready = bus.write_byte(Mode::Instruction, 0x0D, &mut delay);
/// ```
pub struct ParallelBus<DATA, CTRL, CLK>
where
    DATA: OutputPin + InputPin,
    CTRL: OutputPin,
    CLK: SetDutyCycle,
{
    /// Data bus pins D0-D7, least significant bit first
    data: [DATA; 8],
    /// Data select pin A0 (low = instruction, high = character)
    data_select: CTRL,
    /// Clock channel ENB
    clock: CLK,
    /// Write enable pin WR (active low)
    write_enable: CTRL,
    /// Read enable pin RD (active low)
    read_enable: CTRL,
    /// Reset pin (active low)
    reset: CTRL,
    /// Whether this handle started the clock
    clock_enabled: bool,
    /// Timeout for the busy-flag poll in milliseconds
    busy_timeout_ms: u32,
}

impl<DATA, CTRL, CLK, PinErr> ParallelBus<DATA, CTRL, CLK>
where
    DATA: OutputPin<Error = PinErr> + InputPin,
    CTRL: OutputPin<Error = PinErr>,
    CLK: SetDutyCycle,
{
    /// Create a new ParallelBus
    ///
    /// Pure pin assignment; nothing is driven until
    /// [`set_idle`](DisplayInterface::set_idle) or the first transfer. All
    /// thirteen pins are required, there are no defaults.
    ///
    /// # Arguments
    ///
    /// * `data` - Data bus pins, indices 0..7 carrying bits 0..7
    /// * `data_select` - A0 pin (output)
    /// * `clock` - ENB clock channel
    /// * `write_enable` - WR pin (output, active low)
    /// * `read_enable` - RD pin (output, active low)
    /// * `reset` - RESET pin (output, active low)
    pub fn new(
        data: [DATA; 8],
        data_select: CTRL,
        clock: CLK,
        write_enable: CTRL,
        read_enable: CTRL,
        reset: CTRL,
    ) -> Self {
        Self {
            data,
            data_select,
            clock,
            write_enable,
            read_enable,
            reset,
            clock_enabled: false,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }

    /// Set the busy-poll timeout in milliseconds
    ///
    /// Default is 100 ms. A zero timeout makes every poll give up
    /// immediately without sampling the flag.
    pub fn set_busy_timeout(&mut self, timeout_ms: u32) -> &mut Self {
        self.busy_timeout_ms = timeout_ms;
        self
    }

    /// Get the current busy-poll timeout in milliseconds
    pub fn busy_timeout(&self) -> u32 {
        self.busy_timeout_ms
    }

    /// Present a byte on the bus in the given mode and latch it
    ///
    /// Runs the full transfer: mode selection, byte presentation, write
    /// strobe, busy poll. Returns the poll's verdict, see
    /// [`wait_until_not_busy`](Self::wait_until_not_busy).
    ///
    /// This is the raw transfer underneath
    /// [`send_instruction`](DisplayInterface::send_instruction) and
    /// [`send_character`](DisplayInterface::send_character).
    pub fn write_byte<D: DelayNs>(
        &mut self,
        mode: Mode,
        value: u8,
        delay: &mut D,
    ) -> InterfaceResult<bool, InterfaceError<PinErr, CLK::Error>> {
        self.select_mode(mode, delay)?;
        self.present_byte(value, delay)?;
        self.strobe_write(delay)?;
        self.wait_until_not_busy(delay)
    }

    /// Poll the busy flag until the controller reports ready
    ///
    /// D7 doubles as the controller's busy output. The pin is released
    /// (driven high so the pull-up and the controller own the line),
    /// instruction mode is selected, and the flag is then sampled through
    /// read-enable pulses until it reads low or the timeout budget is
    /// spent. One sample costs two settle delays, which is how the
    /// millisecond timeout is priced in iterations. Before returning, D7 is
    /// driven low again in both outcomes.
    ///
    /// Returns `Ok(true)` as soon as the controller reports ready and
    /// `Ok(false)` when the wait was abandoned. A timeout is not an `Err`:
    /// the controller may still accept subsequent transfers, the caller is
    /// simply no longer guaranteed that it will.
    pub fn wait_until_not_busy<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> InterfaceResult<bool, InterfaceError<PinErr, CLK::Error>> {
        // Release D7 so the controller can drive it, and make sure the
        // sampled line carries the busy flag rather than character data.
        self.data[7]
            .set_high()
            .map_err(|e| InterfaceError::Pin(e))?;
        self.select_mode(Mode::Instruction, delay)?;

        // One pass round the loop holds read-enable low for one settle and
        // high for another, pricing the timeout in iterations.
        let polls = self.busy_timeout_ms.saturating_mul(1_000) / (2 * SETTLE_US);

        let mut became_ready = false;
        for _ in 0..polls {
            self.read_enable
                .set_low()
                .map_err(|e| InterfaceError::Pin(e))?;
            delay.delay_us(SETTLE_US);
            let busy = self.data[7].is_high().map_err(|e| InterfaceError::Pin(e))?;
            self.read_enable
                .set_high()
                .map_err(|e| InterfaceError::Pin(e))?;
            delay.delay_us(SETTLE_US);
            if !busy {
                became_ready = true;
                break;
            }
        }

        // Back to output duty, actively held low.
        self.data[7].set_low().map_err(|e| InterfaceError::Pin(e))?;

        if !became_ready {
            log::warn!(
                "ea-x: busy flag still set after {} ms, giving up",
                self.busy_timeout_ms
            );
        }
        Ok(became_ready)
    }

    /// Drive the data-select line for the given mode, then settle
    fn select_mode<D: DelayNs>(
        &mut self,
        mode: Mode,
        delay: &mut D,
    ) -> InterfaceResult<(), InterfaceError<PinErr, CLK::Error>> {
        let result = match mode {
            Mode::Instruction => self.data_select.set_low(),
            Mode::Character => self.data_select.set_high(),
        };
        result.map_err(|e| InterfaceError::Pin(e))?;
        delay.delay_us(SETTLE_US);
        Ok(())
    }

    /// Drive each data pin from the corresponding bit of `value`, then settle
    fn present_byte<D: DelayNs>(
        &mut self,
        value: u8,
        delay: &mut D,
    ) -> InterfaceResult<(), InterfaceError<PinErr, CLK::Error>> {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            let result = if (value >> bit) & 1 == 0 {
                pin.set_low()
            } else {
                pin.set_high()
            };
            result.map_err(|e| InterfaceError::Pin(e))?;
        }
        delay.delay_us(SETTLE_US);
        Ok(())
    }

    /// Pulse the write-enable line to latch the presented byte
    ///
    /// Active low: the falling edge is the instant the controller reads the
    /// bus and the data-select level.
    fn strobe_write<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> InterfaceResult<(), InterfaceError<PinErr, CLK::Error>> {
        self.write_enable
            .set_low()
            .map_err(|e| InterfaceError::Pin(e))?;
        delay.delay_us(SETTLE_US);
        self.write_enable
            .set_high()
            .map_err(|e| InterfaceError::Pin(e))?;
        delay.delay_us(SETTLE_US);
        Ok(())
    }
}

impl<DATA, CTRL, CLK> Drop for ParallelBus<DATA, CTRL, CLK>
where
    DATA: OutputPin + InputPin,
    CTRL: OutputPin,
    CLK: SetDutyCycle,
{
    fn drop(&mut self) {
        // Only stop a clock this handle started. Another handle or the
        // board itself may be relying on it otherwise.
        if self.clock_enabled {
            let _ = self.clock.set_duty_cycle_fully_off();
        }
    }
}

impl<DATA, CTRL, CLK, PinErr> DisplayInterface for ParallelBus<DATA, CTRL, CLK>
where
    DATA: OutputPin<Error = PinErr> + InputPin,
    CTRL: OutputPin<Error = PinErr>,
    CLK: SetDutyCycle,
    CLK::Error: Debug,
    PinErr: Debug,
{
    type Error = InterfaceError<PinErr, CLK::Error>;

    fn send_instruction<D: DelayNs>(
        &mut self,
        code: u8,
        delay: &mut D,
    ) -> InterfaceResult<bool, Self::Error> {
        self.write_byte(Mode::Instruction, code, delay)
    }

    fn send_character<D: DelayNs>(
        &mut self,
        character: u8,
        delay: &mut D,
    ) -> InterfaceResult<bool, Self::Error> {
        self.write_byte(Mode::Character, character, delay)
    }

    fn set_idle(&mut self) -> InterfaceResult<(), Self::Error> {
        self.data_select.set_low().map_err(|e| InterfaceError::Pin(e))?;
        self.clock
            .set_duty_cycle_fully_off()
            .map_err(|e| InterfaceError::Clock(e))?;
        // Write enable, read enable and reset are all active low.
        self.write_enable
            .set_high()
            .map_err(|e| InterfaceError::Pin(e))?;
        self.read_enable
            .set_high()
            .map_err(|e| InterfaceError::Pin(e))?;
        self.reset.set_high().map_err(|e| InterfaceError::Pin(e))?;
        for pin in &mut self.data {
            pin.set_low().map_err(|e| InterfaceError::Pin(e))?;
        }
        Ok(())
    }

    fn hard_reset<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error> {
        // Reset sequence: LOW -> wait 6ms -> HIGH -> wait 6ms
        self.reset.set_low().map_err(|e| InterfaceError::Pin(e))?;
        delay.delay_ms(6);
        self.reset.set_high().map_err(|e| InterfaceError::Pin(e))?;
        delay.delay_ms(6);
        Ok(())
    }

    fn enable_clock(&mut self) -> InterfaceResult<(), Self::Error> {
        self.clock
            .set_duty_cycle_percent(50)
            .map_err(|e| InterfaceError::Clock(e))?;
        self.clock_enabled = true;
        Ok(())
    }

    fn disable_clock(&mut self) -> InterfaceResult<(), Self::Error> {
        self.clock
            .set_duty_cycle_fully_off()
            .map_err(|e| InterfaceError::Clock(e))?;
        self.clock_enabled = false;
        Ok(())
    }
}
