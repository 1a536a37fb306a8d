//! Error types for the driver
//!
//! This module defines [`InterfaceError`], the error returned by the
//! pin-level bus operations in [`crate::interface`].
//!
//! A busy-flag timeout is deliberately not an `Err`: the poll outcome is
//! reported as a `bool` by
//! [`ParallelBus::wait_until_not_busy`](crate::ParallelBus::wait_until_not_busy),
//! and write operations proceed either way. The only `Err` paths are
//! failures reported by the GPIO or PWM implementations themselves.
//!
//! ## Example
//!
//! ```
//! use epson_eax::InterfaceError;
//!
//! # #[derive(Debug)]
//! # struct GpioFault;
//! let err: InterfaceError<GpioFault, core::convert::Infallible> =
//!     InterfaceError::Pin(GpioFault);
//! assert!(matches!(err, InterfaceError::Pin(_)));
//! ```

use core::fmt::Debug;

/// Errors that can occur at the interface level
///
/// Generic over the GPIO and clock-channel error types to preserve the
/// underlying hardware error. On HALs with infallible pins both parameters
/// are [`core::convert::Infallible`] and no variant can be constructed.
#[derive(Debug, PartialEq)]
pub enum InterfaceError<PinErr, ClkErr> {
    /// GPIO pin error
    Pin(PinErr),
    /// Clock (ENB) PWM channel error
    Clock(ClkErr),
}

impl<PinErr: Debug, ClkErr: Debug> core::fmt::Display for InterfaceError<PinErr, ClkErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
            Self::Clock(e) => write!(f, "Clock error: {e:?}"),
        }
    }
}

impl<PinErr: Debug, ClkErr: Debug> core::error::Error for InterfaceError<PinErr, ClkErr> {}

#[cfg(test)]
mod tests {
    use super::*;

    use core::convert::Infallible;

    #[test]
    fn test_errors_compare_by_variant_and_payload() {
        let err: InterfaceError<u8, u8> = InterfaceError::Pin(3);
        assert_eq!(err, InterfaceError::Pin(3));
        assert_ne!(err, InterfaceError::Pin(4));
        assert_ne!(err, InterfaceError::Clock(3));
    }

    // Busy-poll verdicts come back as Result<bool, InterfaceError<..>>;
    // the bus tests compare them against Ok(true)/Ok(false) directly.
    #[test]
    fn test_poll_verdict_results_compare_directly() {
        let ready: core::result::Result<bool, InterfaceError<Infallible, Infallible>> = Ok(true);
        assert_eq!(ready, Ok(true));
        assert_ne!(ready, Ok(false));
    }
}
