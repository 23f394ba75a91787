/*
 *  display/drivers/mock.rs
 *
 *  PriceTick - what's it worth today
 *  (c) 2025-26 Stuart Hunter
 *
 *  Mock display driver for testing without hardware
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
use crate::display::traits::{check_buffer_len, DisplayCapabilities, DisplayDriver};

use std::sync::{Arc, Mutex};

/// Mock display driver for testing
///
/// Records every operation and keeps the last presented frame (decoded
/// to raw RGB565 words) in shared state, so tests can inspect it after
/// the driver has been boxed and handed to a surface.
#[derive(Debug, Clone)]
pub struct MockDriver {
    capabilities: DisplayCapabilities,
    state: Arc<Mutex<MockDriverState>>,
}

/// Internal state for the mock driver (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct MockDriverState {
    /// Number of times init() was called
    pub init_count: usize,

    /// Number of times flush() was called
    pub flush_count: usize,

    /// Number of times clear() was called
    pub clear_count: usize,

    /// Last brightness value set
    pub last_brightness: Option<u8>,

    /// Last rotation set
    pub last_rotation: Option<u16>,

    /// Whether the driver is initialized
    pub is_initialized: bool,

    /// Total bytes written via write_buffer
    pub bytes_written: usize,

    /// Last frame, row major
    pub pixels: Vec<u16>,

    /// Width of the last frame
    pub frame_width: u32,

    /// Simulate failures (for error testing)
    pub simulate_flush_failure: bool,
    pub simulate_init_failure: bool,
}

impl MockDriverState {
    /// Pixels that are not black
    pub fn lit_pixels(&self) -> usize {
        self.pixels.iter().filter(|&&p| p != 0).count()
    }

    /// Pixels of exactly `raw` (RGB565)
    pub fn count_color(&self, raw: u16) -> usize {
        self.pixels.iter().filter(|&&p| p == raw).count()
    }

    /// Pixels of `raw` inside rows [y0, y1)
    pub fn count_color_in_rows(&self, raw: u16, y0: u32, y1: u32) -> usize {
        let w = self.frame_width.max(1) as usize;
        self.pixels
            .chunks(w)
            .enumerate()
            .filter(|(y, _)| (*y as u32) >= y0 && (*y as u32) < y1)
            .map(|(_, row)| row.iter().filter(|&&p| p == raw).count())
            .sum()
    }
}

impl MockDriver {
    /// Create a 16-bit color mock of the given portrait size
    pub fn new_rgb(width: u32, height: u32) -> Self {
        let capabilities = DisplayCapabilities {
            width,
            height,
            supports_rotation: true,
            supports_brightness: true,
        };
        Self {
            capabilities,
            state: Arc::new(Mutex::new(MockDriverState {
                frame_width: width,
                ..Default::default()
            })),
        }
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockDriverState>> {
        Arc::clone(&self.state)
    }
}

impl DisplayDriver for MockDriver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        let mut state = self.state.lock().unwrap();

        if state.simulate_init_failure {
            return Err(DisplayError::Other("Simulated init failure".to_string()));
        }

        state.init_count += 1;
        state.is_initialized = true;
        Ok(())
    }

    fn set_brightness(&mut self, value: u8) -> Result<(), DisplayError> {
        let mut state = self.state.lock().unwrap();
        state.last_brightness = Some(value);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        let mut state = self.state.lock().unwrap();

        if state.simulate_flush_failure {
            return Err(DisplayError::Other("Simulated flush failure".to_string()));
        }

        state.flush_count += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        {
            let mut state = self.state.lock().unwrap();
            state.clear_count += 1;
            state.pixels.iter_mut().for_each(|p| *p = 0);
        } // Release lock before calling flush
        self.flush()
    }

    fn write_buffer(&mut self, buffer: &[u8]) -> Result<(), DisplayError> {
        check_buffer_len(&self.capabilities, buffer)?;

        let mut state = self.state.lock().unwrap();
        state.bytes_written += buffer.len();
        state.frame_width = self.capabilities.width;
        state.pixels = buffer
            .chunks_exact(2)
            .map(|px| u16::from_le_bytes([px[0], px[1]]))
            .collect();
        Ok(())
    }

    fn set_rotation(&mut self, degrees: u16) -> Result<(), DisplayError> {
        if !matches!(degrees, 0 | 90 | 180 | 270) {
            return Err(DisplayError::InvalidRotation(degrees));
        }
        let previous = self.state.lock().unwrap().last_rotation.unwrap_or(0);
        self.capabilities = self.capabilities.rotated(previous, degrees);
        self.state.lock().unwrap().last_rotation = Some(degrees);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_driver_init() {
        let mut driver = MockDriver::new_rgb(170, 320);
        let state = driver.state();
        assert!(!state.lock().unwrap().is_initialized);

        driver.init().unwrap();

        assert_eq!(state.lock().unwrap().init_count, 1);
        assert!(state.lock().unwrap().is_initialized);
    }

    #[test]
    fn test_mock_driver_rotation_tracks_axes() {
        let mut driver = MockDriver::new_rgb(170, 320);
        driver.set_rotation(90).unwrap();
        assert_eq!(driver.dimensions(), (320, 170));
        driver.set_rotation(270).unwrap();
        assert_eq!(driver.dimensions(), (320, 170));
        driver.set_rotation(180).unwrap();
        assert_eq!(driver.dimensions(), (170, 320));
        assert!(driver.set_rotation(45).is_err());
    }

    #[test]
    fn test_mock_driver_simulated_failure() {
        let mut driver = MockDriver::new_rgb(10, 10);
        driver.state().lock().unwrap().simulate_flush_failure = true;
        assert!(driver.flush().is_err());
        driver.state().lock().unwrap().simulate_flush_failure = false;
        assert!(driver.flush().is_ok());
    }

    #[test]
    fn test_mock_driver_write_buffer() {
        let mut driver = MockDriver::new_rgb(4, 2);
        driver.write_buffer(&[0xFF; 16]).unwrap();
        let state = driver.state();
        let state = state.lock().unwrap();
        assert_eq!(state.count_color(0xFFFF), 8);
        assert_eq!(state.count_color_in_rows(0xFFFF, 1, 2), 4);
        assert_eq!(state.bytes_written, 16);
    }

    #[test]
    fn test_mock_driver_buffer_size_mismatch() {
        let mut driver = MockDriver::new_rgb(4, 2);
        assert!(matches!(
            driver.write_buffer(&[0u8; 8]),
            Err(DisplayError::BufferSizeMismatch { expected: 16, actual: 8 })
        ));
    }
}
