//! Character validation for the controller's glyph ROM
//!
//! The EA-X renders a byte by looking it up in a fixed on-chip glyph ROM.
//! Codes outside the ROM's printable range produce garbage cells, so every
//! output path substitutes a space for them instead of transmitting them.
//!
//! | Range       | Meaning                          |
//! |-------------|----------------------------------|
//! | 0x00 - 0x1F | Control codes, not printable     |
//! | 0x20 - 0x7F | ASCII region                     |
//! | 0x80 - 0xDF | Extended glyphs                  |
//! | 0xE0 - 0xFF | Unmapped, not printable          |
//!
//! ## Example
//!
//! ```
//! use epson_eax::validate_character;
//!
//! // Printable codes pass through unchanged
//! assert_eq!(validate_character(b'A'), b'A');
//! assert_eq!(validate_character(0xDF), 0xDF);
//!
//! // Everything else becomes a space
//! assert_eq!(validate_character(0x07), b' '); // bell
//! assert_eq!(validate_character(0xE5), b' ');
//! ```

/// Lowest code the glyph ROM can render (a space)
pub const PRINTABLE_MIN: u8 = 0x20;

/// Highest code the glyph ROM can render
pub const PRINTABLE_MAX: u8 = 0xDF;

/// Validate a character for display
///
/// Returns the input unchanged when it falls inside the printable range
/// [[`PRINTABLE_MIN`], [`PRINTABLE_MAX`]], and a space (0x20) otherwise.
///
/// ## Example
///
/// ```
/// use epson_eax::validate_character;
///
/// assert_eq!(validate_character(0x20), 0x20);
/// assert_eq!(validate_character(0x1F), 0x20);
/// ```
pub fn validate_character(c: u8) -> u8 {
    if (PRINTABLE_MIN..=PRINTABLE_MAX).contains(&c) {
        c
    } else {
        PRINTABLE_MIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_range_passes_through() {
        for c in PRINTABLE_MIN..=PRINTABLE_MAX {
            assert_eq!(validate_character(c), c);
        }
    }

    #[test]
    fn test_control_codes_become_space() {
        for c in 0..PRINTABLE_MIN {
            assert_eq!(validate_character(c), b' ');
        }
    }

    #[test]
    fn test_codes_above_rom_become_space() {
        for c in 0xE0u8..=0xFF {
            assert_eq!(validate_character(c), b' ');
        }
    }

    #[test]
    fn test_range_boundaries() {
        assert_eq!(validate_character(0x1F), b' ');
        assert_eq!(validate_character(0x20), 0x20);
        assert_eq!(validate_character(0xDF), 0xDF);
        assert_eq!(validate_character(0xE0), b' ');
    }
}
