/*
 *  display/surface.rs
 *
 *  PriceTick - what's it worth today
 *  (c) 2025-26 Stuart Hunter
 *
 *  Drawing surface: framebuffer + driver behind a small text API
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

use embedded_graphics::prelude::Point;
use log::{debug, info};

use crate::display::color::Color;
use crate::display::error::DisplayError;
use crate::display::factory::BoxedDriver;
use crate::display::framebuffer::FrameBuffer;
use crate::display::layout::{FontSize, LayoutConfig};
use crate::display::traits::DisplayCapabilities;

/// The drawing surface the ticker renders on
///
/// Drawing calls only touch the framebuffer; nothing reaches the panel
/// until `present()`.
pub struct Surface {
    driver: BoxedDriver,
    framebuffer: FrameBuffer,
    layout: LayoutConfig,
    font: FontSize,
    color: Color,
    rotation: u16,
}

impl Surface {
    /// Wrap a driver; the driver is not initialised here
    pub fn new(driver: BoxedDriver) -> Self {
        let capabilities = driver.capabilities().clone();
        let layout = LayoutConfig::for_display(&capabilities);
        let framebuffer = FrameBuffer::new(&capabilities);
        Self {
            driver,
            framebuffer,
            layout,
            font: FontSize::Small,
            color: Color::White,
            rotation: 0,
        }
    }

    /// Bring up the panel hardware
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.driver.init()?;
        let caps = self.driver.capabilities();
        info!("Display: {}x{} RGB565", caps.width, caps.height);
        Ok(())
    }

    pub fn capabilities(&self) -> &DisplayCapabilities {
        self.driver.capabilities()
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn width(&self) -> u32 {
        self.framebuffer.dimensions().0
    }

    pub fn height(&self) -> u32 {
        self.framebuffer.dimensions().1
    }

    pub fn rotation(&self) -> u16 {
        self.rotation
    }

    /// Blank the framebuffer
    pub fn clear(&mut self) {
        self.framebuffer.fill(Color::Black);
    }

    pub fn set_font(&mut self, size: FontSize) {
        self.font = size;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Draw `text` centered on (x, y) with the current font and color
    pub fn draw_centered_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), DisplayError> {
        let font = self.layout.font(self.font);
        self.framebuffer
            .draw_text_centered(text, Point::new(x, y), font, self.color)
    }

    pub fn set_brightness(&mut self, level: u8) -> Result<(), DisplayError> {
        if !self.driver.capabilities().supports_brightness {
            return Err(DisplayError::UnsupportedOperation);
        }
        self.driver.set_brightness(level)
    }

    /// Rotate the panel and rebuild framebuffer and layout to match
    pub fn set_rotation(&mut self, degrees: u16) -> Result<(), DisplayError> {
        self.driver.set_rotation(degrees)?;
        self.rotation = degrees;
        let capabilities = self.driver.capabilities().clone();
        self.framebuffer = FrameBuffer::new(&capabilities);
        self.layout = LayoutConfig::for_display(&capabilities);
        debug!("Rotation {} -> {}x{}", degrees, capabilities.width, capabilities.height);
        Ok(())
    }

    /// Push the framebuffer to the panel
    pub fn present(&mut self) -> Result<(), DisplayError> {
        let buffer_data = self.framebuffer.to_packed_bytes();
        self.driver.write_buffer(&buffer_data)?;
        self.driver.flush()
    }

    /// Blank both framebuffer and panel
    pub fn blank(&mut self) -> Result<(), DisplayError> {
        self.framebuffer.fill(Color::Black);
        self.driver.clear()
    }
}
