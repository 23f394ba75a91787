/*
 *  display/drivers/snapshot.rs
 *
 *  PriceTick - what's it worth today
 *  (c) 2025-26 Stuart Hunter
 *
 *  Headless driver - every presented frame is written out as a PPM image
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

use log::{debug, info};
use std::fs;
use std::path::PathBuf;

use crate::config::DisplayConfig;
use crate::constants::{DEFAULT_PANEL_HEIGHT, DEFAULT_PANEL_WIDTH, DEFAULT_SNAPSHOT_PATH};
use crate::display::error::DisplayError;
use crate::display::traits::{check_buffer_len, DisplayCapabilities, DisplayDriver};

/// Expand a 5-6-5 pixel to 8 bits per channel and dim it
fn expand565(raw: u16, brightness: u8) -> [u8; 3] {
    let r5 = ((raw >> 11) & 0x1F) as u32;
    let g6 = ((raw >> 5) & 0x3F) as u32;
    let b5 = (raw & 0x1F) as u32;
    let dim = |c: u32| (c * brightness as u32 / 255) as u8;
    [
        dim((r5 << 3) | (r5 >> 2)),
        dim((g6 << 2) | (g6 >> 4)),
        dim((b5 << 3) | (b5 >> 2)),
    ]
}

/// Encode a little-endian RGB565 frame as binary PPM (P6)
pub fn encode_ppm(width: u32, height: u32, frame: &[u8], brightness: u8) -> Vec<u8> {
    let header = format!("P6\n{} {}\n255\n", width, height);
    let mut out = Vec::with_capacity(header.len() + (width * height * 3) as usize);
    out.extend_from_slice(header.as_bytes());
    for px in frame.chunks_exact(2) {
        out.extend_from_slice(&expand565(u16::from_le_bytes([px[0], px[1]]), brightness));
    }
    out
}

/// Snapshot driver for running without a panel
///
/// Behaves like the ST7789 (RGB565, rotatable, dimmable) so the same
/// layout is exercised. The file is replaced atomically on each flush.
pub struct SnapshotDriver {
    path: PathBuf,
    capabilities: DisplayCapabilities,
    frame: Vec<u8>,
    brightness: u8,
    rotation: u16,
    frames_written: u64,
}

impl SnapshotDriver {
    pub fn new(config: &DisplayConfig) -> Result<Self, DisplayError> {
        let width = config.width.unwrap_or(DEFAULT_PANEL_WIDTH);
        let height = config.height.unwrap_or(DEFAULT_PANEL_HEIGHT);
        if width == 0 || height == 0 {
            return Err(DisplayError::InvalidConfiguration("snapshot width/height must be > 0".into()));
        }
        let capabilities = DisplayCapabilities {
            width,
            height,
            supports_rotation: true,
            supports_brightness: true,
        };
        Ok(Self {
            path: PathBuf::from(config.device.as_deref().unwrap_or(DEFAULT_SNAPSHOT_PATH)),
            frame: vec![0; capabilities.frame_len()],
            capabilities,
            brightness: 255,
            rotation: 0,
            frames_written: 0,
        })
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl DisplayDriver for SnapshotDriver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        info!("Snapshot frames -> {}", self.path.display());
        Ok(())
    }

    fn set_brightness(&mut self, value: u8) -> Result<(), DisplayError> {
        self.brightness = value;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        let ppm = encode_ppm(self.capabilities.width, self.capabilities.height, &self.frame, self.brightness);
        let tmp = self.path.with_extension("ppm.tmp");
        fs::write(&tmp, ppm)?;
        fs::rename(&tmp, &self.path)?;
        self.frames_written += 1;
        debug!("snapshot #{} written", self.frames_written);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.frame.fill(0);
        self.flush()
    }

    fn write_buffer(&mut self, buffer: &[u8]) -> Result<(), DisplayError> {
        check_buffer_len(&self.capabilities, buffer)?;
        self.frame.clear();
        self.frame.extend_from_slice(buffer);
        Ok(())
    }

    fn set_rotation(&mut self, degrees: u16) -> Result<(), DisplayError> {
        if !matches!(degrees, 0 | 90 | 180 | 270) {
            return Err(DisplayError::InvalidRotation(degrees));
        }
        self.capabilities = self.capabilities.rotated(self.rotation, degrees);
        self.rotation = degrees;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_at(path: &std::path::Path) -> DisplayConfig {
        DisplayConfig {
            width: Some(4),
            height: Some(2),
            device: Some(path.to_string_lossy().into_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn test_expand565_extremes() {
        assert_eq!(expand565(0xFFFF, 255), [255, 255, 255]);
        assert_eq!(expand565(0xF800, 255), [255, 0, 0]);
        assert_eq!(expand565(0x07E0, 255), [0, 255, 0]);
        assert_eq!(expand565(0xFFFF, 0), [0, 0, 0]);
    }

    #[test]
    fn test_encode_ppm_header_and_size() {
        let ppm = encode_ppm(2, 1, &[0x1F, 0x00, 0x00, 0x00], 255);
        let header = b"P6\n2 1\n255\n";
        assert_eq!(&ppm[..header.len()], header);
        assert_eq!(&ppm[header.len()..], &[0, 0, 255, 0, 0, 0]);
    }

    #[test]
    fn test_rotation_swaps_and_resizes() {
        let path = std::env::temp_dir().join("pricetick-rot.ppm");
        let mut driver = SnapshotDriver::new(&config_at(&path)).unwrap();
        driver.set_rotation(90).unwrap();
        assert_eq!(driver.dimensions(), (2, 4));
        driver.set_rotation(270).unwrap();
        assert_eq!(driver.dimensions(), (2, 4));
        assert!(driver.write_buffer(&vec![0; driver.capabilities().frame_len()]).is_ok());
        driver.set_rotation(0).unwrap();
        assert_eq!(driver.dimensions(), (4, 2));
        assert!(matches!(driver.set_rotation(30), Err(DisplayError::InvalidRotation(30))));
    }

    #[test]
    fn test_flush_writes_file() {
        let path = std::env::temp_dir().join(format!("pricetick-snap-{}.ppm", std::process::id()));
        let mut driver = SnapshotDriver::new(&config_at(&path)).unwrap();
        driver.init().unwrap();
        driver.write_buffer(&[0xFF; 16]).unwrap();
        driver.flush().unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P6\n4 2\n255\n"));
        assert_eq!(bytes.len(), b"P6\n4 2\n255\n".len() + 4 * 2 * 3);
        assert_eq!(driver.frames_written(), 1);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_wrong_buffer_rejected() {
        let path = std::env::temp_dir().join("pricetick-bad.ppm");
        let mut driver = SnapshotDriver::new(&config_at(&path)).unwrap();
        assert!(driver.write_buffer(&[0; 3]).is_err());
    }
}
