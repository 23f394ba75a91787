/*
 *  display/drivers/fbdev.rs
 *
 *  PriceTick - what's it worth today
 *  (c) 2025-26 Stuart Hunter
 *
 *  Linux framebuffer driver (/dev/fbN, 16bpp)
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

use log::{debug, info, warn};
use memmap2::{MmapMut, MmapOptions};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::config::DisplayConfig;
use crate::constants::{DEFAULT_FB_DEVICE, SYSFS_GRAPHICS};
use crate::display::error::DisplayError;
use crate::display::traits::{check_buffer_len, DisplayCapabilities, DisplayDriver};

/// Geometry as reported by /sys/class/graphics/fbN
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FbGeometry {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u32,
    /// Bytes per scanline
    pub stride: usize,
}

impl FbGeometry {
    /// Read virtual_size, bits_per_pixel and stride from a sysfs node
    pub fn from_sysfs(dir: &Path) -> Result<Self, DisplayError> {
        let read = |name: &str| -> Result<String, DisplayError> {
            Ok(fs::read_to_string(dir.join(name))?.trim().to_string())
        };
        let (width, height) = parse_virtual_size(&read("virtual_size")?).ok_or_else(|| {
            DisplayError::InvalidConfiguration(format!("bad virtual_size in {}", dir.display()))
        })?;
        let bits_per_pixel = read("bits_per_pixel")?
            .parse::<u32>()
            .map_err(|e| DisplayError::InvalidConfiguration(format!("bits_per_pixel: {}", e)))?;
        // stride is missing on some older kernels
        let stride = match read("stride") {
            Ok(s) => s
                .parse::<usize>()
                .map_err(|e| DisplayError::InvalidConfiguration(format!("stride: {}", e)))?,
            Err(_) => (width * bits_per_pixel / 8) as usize,
        };
        Ok(Self { width, height, bits_per_pixel, stride })
    }
}

/// "320,170" -> (320, 170)
pub fn parse_virtual_size(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.trim().split_once(',')?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

/// Scale 0-255 onto a backlight's 0..=max range
pub fn scale_brightness(value: u8, max: u32) -> u32 {
    (value as u32 * max + 127) / 255
}

/// Linux framebuffer driver
///
/// The device is mapped on `init()`; frames are copied row by row so a
/// panel narrower than the scanline stride still lines up.
pub struct FbdevDriver {
    device: PathBuf,
    geometry: FbGeometry,
    backlight: Option<PathBuf>,
    max_brightness: u32,
    capabilities: DisplayCapabilities,
    mmap: Option<MmapMut>,
}

impl FbdevDriver {
    pub fn new(config: &DisplayConfig) -> Result<Self, DisplayError> {
        let device = PathBuf::from(config.device.as_deref().unwrap_or(DEFAULT_FB_DEVICE));
        let node = device
            .file_name()
            .ok_or_else(|| DisplayError::InvalidConfiguration(format!("bad device {}", device.display())))?;
        let geometry = FbGeometry::from_sysfs(&Path::new(SYSFS_GRAPHICS).join(node))?;

        if geometry.bits_per_pixel != 16 {
            return Err(DisplayError::InvalidConfiguration(format!(
                "{} is {}bpp, only 16bpp (RGB565) is supported",
                device.display(),
                geometry.bits_per_pixel
            )));
        }

        // a configured size smaller than the framebuffer draws top-left
        let width = config.width.unwrap_or(geometry.width).min(geometry.width);
        let height = config.height.unwrap_or(geometry.height).min(geometry.height);
        if width as usize * 2 > geometry.stride {
            return Err(DisplayError::InvalidConfiguration(format!(
                "stride {} too small for width {}",
                geometry.stride, width
            )));
        }

        let backlight = config.backlight.as_ref().map(PathBuf::from);
        let max_brightness = match backlight.as_ref() {
            Some(dir) => fs::read_to_string(dir.join("max_brightness"))
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or_else(|| {
                    warn!("No max_brightness under {}, assuming 255", dir.display());
                    255
                }),
            None => 0,
        };

        debug!("fbdev {} geometry {:?}", device.display(), geometry);

        Ok(Self {
            capabilities: DisplayCapabilities {
                width,
                height,
                supports_rotation: false,
                supports_brightness: backlight.is_some(),
            },
            device,
            geometry,
            backlight,
            max_brightness,
            mmap: None,
        })
    }

    fn mapped(&mut self) -> Result<&mut MmapMut, DisplayError> {
        self.mmap
            .as_mut()
            .ok_or_else(|| DisplayError::InitializationFailed("framebuffer not mapped".to_string()))
    }
}

impl DisplayDriver for FbdevDriver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.device)
            .map_err(|e| DisplayError::InitializationFailed(format!("{}: {}", self.device.display(), e)))?;

        let len = self.geometry.stride * self.geometry.height as usize;
        // SAFETY: the mapping is only touched through this driver and the
        // length comes from the kernel's own geometry
        let mmap = unsafe { MmapOptions::new().len(len).map_mut(&file)? };
        self.mmap = Some(mmap);

        info!(
            "fbdev {} mapped: {}x{} stride {}",
            self.device.display(),
            self.geometry.width,
            self.geometry.height,
            self.geometry.stride
        );
        Ok(())
    }

    fn set_brightness(&mut self, value: u8) -> Result<(), DisplayError> {
        let Some(dir) = self.backlight.as_ref() else {
            return Err(DisplayError::UnsupportedOperation);
        };
        let level = scale_brightness(value, self.max_brightness);
        fs::write(dir.join("brightness"), level.to_string())?;
        debug!("backlight {} -> {}", dir.display(), level);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        // writes land in video memory directly, nothing is buffered
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.mapped()?.fill(0);
        Ok(())
    }

    fn write_buffer(&mut self, buffer: &[u8]) -> Result<(), DisplayError> {
        check_buffer_len(&self.capabilities, buffer)?;
        let row_bytes = self.capabilities.width as usize * 2;
        let stride = self.geometry.stride;
        let mmap = self.mapped()?;
        for (y, row) in buffer.chunks_exact(row_bytes).enumerate() {
            let start = y * stride;
            mmap[start..start + row_bytes].copy_from_slice(row);
        }
        Ok(())
    }
}
