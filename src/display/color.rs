/*
 *  display/color.rs
 *
 *  PriceTick - what's it worth today
 *  (c) 2025-26 Stuart Hunter
 *
 *  Named RGB565 color palette
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

use embedded_graphics::pixelcolor::{Rgb565, raw::RawU16};

/// Named panel colors
///
/// Values are the usual 5-6-5 TFT palette so a color looks the same on the
/// panel as it does in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    White,
    Red,
    Green,
    Cyan,
    Yellow,
    Orange,
    /// Raw 5-6-5 value
    Raw(u16),
}

impl Color {
    /// 5-6-5 encoding
    pub fn raw565(&self) -> u16 {
        match self {
            Color::Black => 0x0000,
            Color::White => 0xFFFF,
            Color::Red => 0xF800,
            Color::Green => 0x07E0,
            Color::Cyan => 0x07FF,
            Color::Yellow => 0xFFE0,
            Color::Orange => 0xFDA0,
            Color::Raw(v) => *v,
        }
    }

    pub fn to_rgb565(&self) -> Rgb565 {
        Rgb565::from(RawU16::new(self.raw565()))
    }
}
