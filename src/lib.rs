//! Epson EA-X Alphanumeric LCD Driver
//!
//! A driver for the Epson EA-X family of alphanumeric LCD controllers, which
//! are driven over a bit-banged 8-bit parallel bus with separate data-select,
//! clock, write-enable, read-enable and reset lines. Supports one- and
//! two-line panels.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - Full EA-X command set: cursor movement and styling, display on/off,
//!   clearing, output suppression
//! - Busy-flag polling with a bounded, configurable timeout
//! - Shared-clock aware: a bus handle only ever stops a clock it started
//!
//! The driver is synchronous and blocking. Nothing here synchronizes
//! concurrent access to the pins; keep one owner per bus.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::pwm::SetDutyCycle;
//! use epson_eax::{Display, ParallelBus};
//!
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
//! // One entry per wire: D0-D7, then A0, ENB, WR, RD, RESET
//! let bus = ParallelBus::new(
//!     [MockPin, MockPin, MockPin, MockPin, MockPin, MockPin, MockPin, MockPin],
//!     MockPin,   // A0: data select
//!     MockClock, // ENB: clock
//!     MockPin,   // WR: write enable
//!     MockPin,   // RD: read enable
//!     MockPin,   // RESET
//! );
//!
//! let mut display = Display::new(bus);
//! let _ = display.init(&mut delay);
//! let _ = display.enable_clock();
//! let _ = display.write_str("Hello, world!", &mut delay);
//! let _ = display.set_cursor_pos(0, 1, &mut delay);
//! let _ = display.write_str("Second line", &mut delay);
//! ```

#![no_std]

#[cfg(test)]
extern crate alloc;

/// Character validation for the controller's glyph ROM
pub mod charset;
/// EA-X command definitions
pub mod command;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Hardware interface abstraction
pub mod interface;

pub use charset::{PRINTABLE_MAX, PRINTABLE_MIN, validate_character};
pub use display::{BOOT_DELAY_MS, CursorDirection, DEFAULT_WRITE_LIMIT, Display};
pub use error::InterfaceError;
pub use interface::{DEFAULT_BUSY_TIMEOUT_MS, DisplayInterface, Mode, ParallelBus, SETTLE_US};
