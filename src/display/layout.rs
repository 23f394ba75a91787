/*
 *  display/layout.rs
 *
 *  PriceTick - what's it worth today
 *  (c) 2025-26 Stuart Hunter
 *
 *  Font sizes and screen positions derived from display capabilities
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

use embedded_graphics::mono_font::{MonoFont, ascii::{FONT_8X13, FONT_10X20}};

use super::traits::DisplayCapabilities;

/// Font size categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    /// Status and footer lines
    Small,

    /// Headlines
    Medium,

    /// The price itself
    Large,
}

/// A concrete font choice: mono font plus integer pixel scale
#[derive(Debug, Clone, Copy)]
pub struct FontSpec {
    pub font: &'static MonoFont<'static>,
    pub scale: u32,
}

impl FontSpec {
    /// Rendered size of `text` in pixels
    pub fn text_size(&self, text: &str) -> (u32, u32) {
        let chars = text.chars().count() as u32;
        let advance = self.font.character_size.width + self.font.character_spacing;
        let w = (chars * advance).saturating_sub(self.font.character_spacing);
        (w * self.scale, self.font.character_size.height * self.scale)
    }
}

/// Positions and fonts for the three screens
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub width: u32,
    pub height: u32,

    /// Baseline-middle y of the price label
    pub label_y: i32,

    /// Baseline-middle y of the refresh footer
    pub footer_y: i32,

    /// Offset of the ERROR headline above center
    pub headline_offset: i32,

    /// Gap between headline and detail line
    pub detail_gap: i32,

    small: FontSpec,
    medium: FontSpec,
    large: FontSpec,
}

impl LayoutConfig {
    /// Lay the screens out for the driver's logical size
    pub fn for_display(capabilities: &DisplayCapabilities) -> Self {
        let (width, height) = (capabilities.width, capabilities.height);
        Self {
            width,
            height,
            label_y: 20,
            footer_y: height as i32 - 20,
            headline_offset: 10,
            detail_gap: 20,
            small: FontSpec { font: &FONT_8X13, scale: 1 },
            medium: FontSpec { font: &FONT_10X20, scale: 1 },
            large: FontSpec { font: &FONT_10X20, scale: 2 },
        }
    }

    pub fn font(&self, size: FontSize) -> FontSpec {
        match size {
            FontSize::Small => self.small,
            FontSize::Medium => self.medium,
            FontSize::Large => self.large,
        }
    }

    pub fn center_x(&self) -> i32 {
        (self.width / 2) as i32
    }

    pub fn center_y(&self) -> i32 {
        (self.height / 2) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(width: u32, height: u32) -> DisplayCapabilities {
        DisplayCapabilities {
            width,
            height,
            supports_rotation: true,
            supports_brightness: true,
        }
    }

    #[test]
    fn test_layout_landscape_tft() {
        let layout = LayoutConfig::for_display(&caps(320, 170));
        assert_eq!(layout.label_y, 20);
        assert_eq!(layout.footer_y, 150);
        assert_eq!(layout.font(FontSize::Large).scale, 2);
        assert_eq!((layout.center_x(), layout.center_y()), (160, 85));
    }

    #[test]
    fn test_layout_follows_portrait() {
        let layout = LayoutConfig::for_display(&caps(170, 320));
        assert_eq!(layout.footer_y, 300);
        assert_eq!(layout.center_x(), 85);
    }

    #[test]
    fn test_price_fits_landscape_width() {
        let layout = LayoutConfig::for_display(&caps(320, 170));
        let (w, h) = layout.font(FontSize::Large).text_size("123456.78");
        assert!(w <= 320);
        assert_eq!(h, 40);
    }
}
