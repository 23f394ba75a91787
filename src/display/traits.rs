/*
 *  display/traits.rs
 *
 *  PriceTick - what's it worth today
 *  (c) 2025-26 Stuart Hunter
 *
 *  Core trait definitions for display driver abstraction
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use crate::display::error::DisplayError;

/// Bytes per pixel of the packed frame: RGB565, little endian
pub const BYTES_PER_PIXEL: usize = 2;

/// Display capabilities and metadata
#[derive(Debug, Clone)]
pub struct DisplayCapabilities {
    /// Logical width in pixels (after rotation)
    pub width: u32,

    /// Logical height in pixels (after rotation)
    pub height: u32,

    /// Whether the display supports rotation
    pub supports_rotation: bool,

    /// Whether the display supports brightness control
    pub supports_brightness: bool,
}

impl DisplayCapabilities {
    /// Capabilities after turning from `from` to `to` degrees
    ///
    /// Axes swap only when the turn changes portrait to landscape or back.
    pub fn rotated(&self, from: u16, to: u16) -> Self {
        let quarter = |d: u16| d == 90 || d == 270;
        let mut caps = self.clone();
        if quarter(from) != quarter(to) {
            std::mem::swap(&mut caps.width, &mut caps.height);
        }
        caps
    }

    /// Size in bytes of one packed frame
    pub fn frame_len(&self) -> usize {
        (self.width * self.height) as usize * BYTES_PER_PIXEL
    }
}

/// Minimal hardware abstraction - all display drivers must implement this trait
///
/// The surface renders into its own framebuffer and hands the driver a
/// packed buffer; drivers never see drawing primitives.
pub trait DisplayDriver: Send {
    /// Returns the capabilities of this display
    fn capabilities(&self) -> &DisplayCapabilities;

    /// Returns the logical display dimensions as (width, height)
    fn dimensions(&self) -> (u32, u32) {
        let caps = self.capabilities();
        (caps.width, caps.height)
    }

    /// Initialize the display hardware
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Set display brightness (0-255)
    fn set_brightness(&mut self, value: u8) -> Result<(), DisplayError>;

    /// Flush any pending output to the panel
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Clear the display to black
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Write a packed RGB565 frame, 2 bytes per pixel, little endian
    fn write_buffer(&mut self, buffer: &[u8]) -> Result<(), DisplayError>;

    /// Set display rotation (0, 90, 180 or 270 degrees)
    ///
    /// On success the logical dimensions reported by `capabilities()`
    /// reflect the new orientation.
    fn set_rotation(&mut self, degrees: u16) -> Result<(), DisplayError> {
        if !self.capabilities().supports_rotation {
            return Err(DisplayError::UnsupportedOperation);
        }
        if !matches!(degrees, 0 | 90 | 180 | 270) {
            return Err(DisplayError::InvalidRotation(degrees));
        }
        // Default implementation returns error; drivers should override
        Err(DisplayError::UnsupportedOperation)
    }
}

/// Check a packed buffer against the driver's geometry
pub fn check_buffer_len(caps: &DisplayCapabilities, buffer: &[u8]) -> Result<(), DisplayError> {
    let expected = caps.frame_len();
    if buffer.len() != expected {
        return Err(DisplayError::BufferSizeMismatch {
            expected,
            actual: buffer.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portrait() -> DisplayCapabilities {
        DisplayCapabilities {
            width: 170,
            height: 320,
            supports_rotation: true,
            supports_brightness: true,
        }
    }

    #[test]
    fn test_frame_len() {
        assert_eq!(portrait().frame_len(), 170 * 320 * 2);
    }

    #[test]
    fn test_rotated_dimensions() {
        let caps = portrait();
        let landscape = caps.rotated(0, 90);
        assert_eq!((landscape.width, landscape.height), (320, 170));

        let flipped = caps.rotated(0, 180);
        assert_eq!((flipped.width, flipped.height), (170, 320));

        // 90 -> 270 stays landscape
        let still = landscape.rotated(90, 270);
        assert_eq!((still.width, still.height), (320, 170));
        assert_eq!(landscape.rotated(90, 0).width, 170);
    }

    #[test]
    fn test_buffer_len_checked() {
        let caps = portrait();
        assert!(check_buffer_len(&caps, &vec![0; caps.frame_len()]).is_ok());
        assert!(matches!(
            check_buffer_len(&caps, &[0; 10]),
            Err(DisplayError::BufferSizeMismatch { actual: 10, .. })
        ));
    }
}
