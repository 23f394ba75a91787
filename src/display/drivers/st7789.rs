/*
 *  display/drivers/st7789.rs
 *
 *  PriceTick - what's it worth today
 *  (c) 2025-26 Stuart Hunter
 *
 *  ST7789 over an 8-bit parallel GPIO bus (mipidsi + sysfs pins)
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

use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_hal::digital::{OutputPin, PinState};
use linux_embedded_hal::{Delay, SysfsPin};
use log::{debug, info};
use mipidsi::interface::{Generic8BitBus, ParallelInterface};
use mipidsi::models::ST7789;
use mipidsi::options::{ColorInversion, ColorOrder, Orientation, Rotation};
use mipidsi::{Builder, Display};

use crate::config::DisplayConfig;
use crate::display::error::DisplayError;
use crate::display::panel::PanelConfig;
use crate::display::traits::{check_buffer_len, DisplayCapabilities, DisplayDriver};

type DataBus = Generic8BitBus<
    SysfsPin, SysfsPin, SysfsPin, SysfsPin,
    SysfsPin, SysfsPin, SysfsPin, SysfsPin,
>;
type PanelInterface = ParallelInterface<DataBus, SysfsPin, SysfsPin>;
type PanelDisplay = Display<PanelInterface, ST7789, SysfsPin>;

fn output_pin(number: u32, state: PinState) -> Result<SysfsPin, DisplayError> {
    let pin = SysfsPin::new(number as u64);
    pin.export()
        .map_err(|e| DisplayError::BusError(format!("export gpio{}: {}", number, e)))?;
    pin.into_output_pin(state)
        .map_err(|e| DisplayError::BusError(format!("gpio{} as output: {}", number, e)))
}

fn rotation_for(degrees: u16) -> Result<Rotation, DisplayError> {
    match degrees {
        0 => Ok(Rotation::Deg0),
        90 => Ok(Rotation::Deg90),
        180 => Ok(Rotation::Deg180),
        270 => Ok(Rotation::Deg270),
        other => Err(DisplayError::InvalidRotation(other)),
    }
}

/// ST7789 panel driver
///
/// Pins are taken from the `PanelConfig` table; the controller is only
/// brought up in `init()`.
pub struct St7789Driver {
    panel: PanelConfig,
    capabilities: DisplayCapabilities,
    display: Option<PanelDisplay>,
    backlight: Option<SysfsPin>,
    rotation: u16,
}

impl St7789Driver {
    pub fn new(config: &DisplayConfig) -> Result<Self, DisplayError> {
        let panel = config.panel.clone().unwrap_or_default();
        panel.validate().map_err(DisplayError::InvalidConfiguration)?;
        if panel.panel.pin_rst.is_none() {
            return Err(DisplayError::InvalidConfiguration("st7789 needs a reset pin".into()));
        }

        let capabilities = DisplayCapabilities {
            width: panel.panel.panel_width as u32,
            height: panel.panel.panel_height as u32,
            supports_rotation: true,
            supports_brightness: true,
        };
        Ok(Self { panel, capabilities, display: None, backlight: None, rotation: 0 })
    }

    fn display(&mut self) -> Result<&mut PanelDisplay, DisplayError> {
        self.display
            .as_mut()
            .ok_or_else(|| DisplayError::InitializationFailed("st7789 not initialised".to_string()))
    }
}

impl DisplayDriver for St7789Driver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        let bus_cfg = &self.panel.bus;
        let geo = &self.panel.panel;
        let d = bus_cfg.pin_data;

        let data = Generic8BitBus::new((
            output_pin(d[0], PinState::Low)?,
            output_pin(d[1], PinState::Low)?,
            output_pin(d[2], PinState::Low)?,
            output_pin(d[3], PinState::Low)?,
            output_pin(d[4], PinState::Low)?,
            output_pin(d[5], PinState::Low)?,
            output_pin(d[6], PinState::Low)?,
            output_pin(d[7], PinState::Low)?,
        ));
        let dc = output_pin(bus_cfg.pin_rs, PinState::Low)?;
        let wr = output_pin(bus_cfg.pin_wr, PinState::High)?;
        // RD idles high, CS is held asserted for the life of the process
        let _rd = output_pin(bus_cfg.pin_rd, PinState::High)?;
        if let Some(cs) = geo.pin_cs {
            let _cs = output_pin(cs, PinState::Low)?;
        }
        let rst_pin = geo
            .pin_rst
            .ok_or_else(|| DisplayError::InvalidConfiguration("st7789 needs a reset pin".into()))?;
        let rst = output_pin(rst_pin, PinState::High)?;

        let order = if geo.rgb_order { ColorOrder::Bgr } else { ColorOrder::Rgb };
        let inversion = if geo.invert { ColorInversion::Inverted } else { ColorInversion::Normal };

        let display = Builder::new(ST7789, ParallelInterface::new(data, dc, wr))
            .reset_pin(rst)
            .display_size(geo.panel_width, geo.panel_height)
            .display_offset(geo.offset_x, geo.offset_y)
            .color_order(order)
            .invert_colors(inversion)
            .orientation(Orientation::new().rotate(rotation_for(self.rotation)?))
            .init(&mut Delay)
            .map_err(|e| DisplayError::InitializationFailed(format!("st7789: {:?}", e)))?;
        self.display = Some(display);

        let light = &self.panel.light;
        let on = if light.invert { PinState::Low } else { PinState::High };
        self.backlight = Some(output_pin(light.pin_bl, on)?);

        info!(
            "ST7789 {}x{} up, offset {}/{}",
            geo.panel_width, geo.panel_height, geo.offset_x, geo.offset_y
        );
        Ok(())
    }

    /// Sysfs GPIO has no PWM, anything above zero is full on
    fn set_brightness(&mut self, value: u8) -> Result<(), DisplayError> {
        let invert = self.panel.light.invert;
        let Some(pin) = self.backlight.as_mut() else {
            return Err(DisplayError::InitializationFailed("backlight not initialised".to_string()));
        };
        let lit = (value > 0) != invert;
        let result = if lit { pin.set_high() } else { pin.set_low() };
        result.map_err(|e| DisplayError::BusError(format!("backlight: {:?}", e)))?;
        debug!("backlight {}", if value > 0 { "on" } else { "off" });
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.display()?
            .clear(Rgb565::BLACK)
            .map_err(|e| DisplayError::BusError(format!("{:?}", e)))
    }

    fn write_buffer(&mut self, buffer: &[u8]) -> Result<(), DisplayError> {
        check_buffer_len(&self.capabilities, buffer)?;
        let area = Rectangle::new(Point::zero(), Size::new(self.capabilities.width, self.capabilities.height));
        let colors = buffer
            .chunks_exact(2)
            .map(|px| Rgb565::from(RawU16::new(u16::from_le_bytes([px[0], px[1]]))));
        self.display()?
            .fill_contiguous(&area, colors)
            .map_err(|e| DisplayError::BusError(format!("{:?}", e)))
    }

    fn set_rotation(&mut self, degrees: u16) -> Result<(), DisplayError> {
        let rotation = rotation_for(degrees)?;
        if let Some(display) = self.display.as_mut() {
            display
                .set_orientation(Orientation::new().rotate(rotation))
                .map_err(|e| DisplayError::BusError(format!("{:?}", e)))?;
        }
        self.capabilities = self.capabilities.rotated(self.rotation, degrees);
        self.rotation = degrees;
        Ok(())
    }
}
