/*
 *  display/panel.rs
 *
 *  PriceTick - what's it worth today
 *  (c) 2025-26 Stuart Hunter
 *
 *  Panel wiring and timing table, defaults for LilyGO T-Display-S3
 *  (ST7789, 170x320, 8-bit parallel)
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

use serde::{Deserialize, Serialize};

/// 8-bit parallel bus wiring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Max write clock in Hz
    pub freq_write: u32,
    pub pin_wr: u32,
    pub pin_rd: u32,
    /// D/C (register select)
    pub pin_rs: u32,
    /// D0..D7
    pub pin_data: [u32; 8],
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            freq_write: 20_000_000,
            pin_wr: 8,
            pin_rd: 9,
            pin_rs: 7,
            pin_data: [39, 40, 41, 42, 45, 46, 47, 48],
        }
    }
}

/// Panel geometry and controller quirks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelGeometry {
    pub pin_cs: Option<u32>,
    pub pin_rst: Option<u32>,
    pub pin_busy: Option<u32>,
    pub panel_width: u16,
    pub panel_height: u16,
    pub offset_x: u16,
    pub offset_y: u16,
    pub offset_rotation: u8,
    pub dummy_read_pixel: u8,
    pub dummy_read_bits: u8,
    pub readable: bool,
    pub invert: bool,
    /// true = BGR
    pub rgb_order: bool,
    pub dlen_16bit: bool,
    pub bus_shared: bool,
}

impl Default for PanelGeometry {
    fn default() -> Self {
        Self {
            pin_cs: Some(6),
            pin_rst: Some(5),
            pin_busy: None,
            panel_width: 170,
            panel_height: 320,
            offset_x: 35,
            offset_y: 0,
            offset_rotation: 0,
            dummy_read_pixel: 8,
            dummy_read_bits: 1,
            readable: true,
            invert: true,
            rgb_order: false,
            dlen_16bit: false,
            bus_shared: false,
        }
    }
}

/// PWM backlight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacklightConfig {
    pub pin_bl: u32,
    pub invert: bool,
    pub freq: u32,
    pub pwm_channel: u8,
}

impl Default for BacklightConfig {
    fn default() -> Self {
        Self {
            pin_bl: 38,
            invert: false,
            freq: 44_100,
            pwm_channel: 7,
        }
    }
}

/// Complete panel table: bus, panel and light sections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub bus: BusConfig,
    pub panel: PanelGeometry,
    pub light: BacklightConfig,
}

impl PanelConfig {
    /// Check the table for wiring mistakes
    pub fn validate(&self) -> Result<(), String> {
        if self.panel.panel_width == 0 || self.panel.panel_height == 0 {
            return Err("panel width/height must be > 0".into());
        }
        let mut pins: Vec<u32> = self.bus.pin_data.to_vec();
        pins.extend([self.bus.pin_wr, self.bus.pin_rd, self.bus.pin_rs, self.light.pin_bl]);
        pins.extend(self.panel.pin_cs);
        pins.extend(self.panel.pin_rst);
        pins.extend(self.panel.pin_busy);

        let mut sorted = pins.clone();
        sorted.sort_unstable();
        if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(format!("panel pin {} assigned twice", w[0]));
        }
        Ok(())
    }
}
