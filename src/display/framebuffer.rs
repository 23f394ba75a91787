/*
 *  display/framebuffer.rs
 *
 *  PriceTick - what's it worth today
 *  (c) 2025-26 Stuart Hunter
 *
 *  RGB565 framebuffer the screens draw into
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

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::{BinaryColor, IntoStorage, Rgb565, RgbColor};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use crate::display::color::Color;
use crate::display::error::DisplayError;
use crate::display::layout::FontSpec;
use crate::display::traits::{DisplayCapabilities, BYTES_PER_PIXEL};
use crate::vframebuf::VarFrameBuf;

/// Off-screen frame sized to the driver's logical geometry
///
/// Rendering code works in `Color`; the pixel type stays in here.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    fb: VarFrameBuf<Rgb565>,
}

impl FrameBuffer {
    pub fn new(capabilities: &DisplayCapabilities) -> Self {
        Self {
            fb: VarFrameBuf::new(capabilities.width, capabilities.height, Rgb565::BLACK),
        }
    }

    /// Get dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.fb.width() as u32, self.fb.height() as u32)
    }

    /// Fill the whole buffer with one color
    pub fn fill(&mut self, color: Color) {
        self.fb.clear_color(color.to_rgb565());
    }

    /// Draw `text` centered (both axes) on `center`
    pub fn draw_text_centered(
        &mut self,
        text: &str,
        center: Point,
        font: FontSpec,
        color: Color,
    ) -> Result<(), DisplayError> {
        draw_centered(&mut self.fb, text, center, font, color.to_rgb565())
    }

    /// Pack for `write_buffer()`: 2 bytes per pixel, little endian
    pub fn to_packed_bytes(&self) -> Vec<u8> {
        let pixels = self.fb.as_slice();
        let mut bytes = Vec::with_capacity(pixels.len() * BYTES_PER_PIXEL);
        for pixel in pixels {
            bytes.extend_from_slice(&pixel.into_storage().to_le_bytes());
        }
        bytes
    }
}

/// Draw text centered on `center`, scaling the glyphs by `font.scale`
///
/// Mono fonts top out at 10x20 so larger text is rasterised once into a
/// 1-bit mask and each lit mask pixel becomes a `scale` x `scale` block.
fn draw_centered<D, C>(
    target: &mut D,
    text: &str,
    center: Point,
    font: FontSpec,
    color: C,
) -> Result<(), DisplayError>
where
    D: DrawTarget<Color = C>,
    C: PixelColor,
{
    if text.is_empty() {
        return Ok(());
    }

    if font.scale <= 1 {
        let character_style = MonoTextStyle::new(font.font, color);
        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        Text::with_text_style(text, center, character_style, text_style)
            .draw(target)
            .map_err(|_| DisplayError::DrawingError(format!("Failed to draw '{}'", text)))?;
        return Ok(());
    }

    let unscaled = FontSpec { font: font.font, scale: 1 };
    let (mask_w, mask_h) = unscaled.text_size(text);
    let mut mask = VarFrameBuf::new(mask_w.max(1), mask_h.max(1), BinaryColor::Off);
    let mask_style = MonoTextStyle::new(font.font, BinaryColor::On);
    Text::with_baseline(text, Point::zero(), mask_style, Baseline::Top)
        .draw(&mut mask)
        .map_err(|_| DisplayError::DrawingError(format!("Failed to rasterise '{}'", text)))?;

    let scale = font.scale as i32;
    let origin = center - Point::new(mask_w as i32 * scale / 2, mask_h as i32 * scale / 2);
    let block = Size::new(font.scale, font.scale);

    for y in 0..mask_h {
        for x in 0..mask_w {
            if mask.get(x, y) == Some(BinaryColor::On) {
                let top_left = origin + Point::new(x as i32 * scale, y as i32 * scale);
                target
                    .fill_solid(&Rectangle::new(top_left, block), color)
                    .map_err(|_| DisplayError::DrawingError("Failed to draw scaled glyph".to_string()))?;
            }
        }
    }
    Ok(())
}
