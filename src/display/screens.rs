/*
 *  display/screens.rs
 *
 *  PriceTick - what's it worth today
 *  (c) 2025-26 Stuart Hunter
 *
 *  Status, error and price screens
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

use arrayvec::ArrayString;
use std::fmt::Write;

use crate::display::color::Color;
use crate::display::error::DisplayError;
use crate::display::layout::FontSize;
use crate::display::surface::Surface;

/// Fixed text of the price screen
#[derive(Debug, Clone)]
pub struct PriceLabels {
    /// Top line, e.g. "BTC / EUR"
    pub label: String,

    /// Bottom line, e.g. "Update every 30s"
    pub footer: String,
}

impl PriceLabels {
    pub fn new(label: &str, interval_secs: u64) -> Self {
        Self {
            label: label.to_string(),
            footer: format!("Update every {}s", interval_secs),
        }
    }
}

/// Two decimal places, kept on the stack
pub fn format_price(price: f64) -> ArrayString<32> {
    let mut buf = ArrayString::new();
    if write!(&mut buf, "{:.2}", price).is_err() {
        buf.clear();
        let _ = write!(&mut buf, "{:.3e}", price);
    }
    buf
}

/// Single centred line in `color`
pub fn render_status(surface: &mut Surface, message: &str, color: Color) -> Result<(), DisplayError> {
    let (cx, cy) = (surface.layout().center_x(), surface.layout().center_y());
    surface.clear();
    surface.set_font(FontSize::Small);
    surface.set_color(color);
    surface.draw_centered_text(message, cx, cy)?;
    surface.present()
}

/// "ERROR" headline above centre with the detail line under it
pub fn render_error(surface: &mut Surface, detail: &str) -> Result<(), DisplayError> {
    let layout = surface.layout();
    let (cx, cy) = (layout.center_x(), layout.center_y());
    let headline_y = cy - layout.headline_offset;
    let detail_y = headline_y + layout.detail_gap;

    surface.clear();
    surface.set_font(FontSize::Medium);
    surface.set_color(Color::Red);
    surface.draw_centered_text("ERROR", cx, headline_y)?;

    surface.set_font(FontSize::Small);
    surface.set_color(Color::White);
    surface.draw_centered_text(detail, cx, detail_y)?;
    surface.present()
}

/// Label, large price and refresh footer
pub fn render_price(surface: &mut Surface, labels: &PriceLabels, price: f64) -> Result<(), DisplayError> {
    let layout = surface.layout();
    let (cx, cy) = (layout.center_x(), layout.center_y());
    let (label_y, footer_y) = (layout.label_y, layout.footer_y);
    let value = format_price(price);

    surface.clear();
    surface.set_font(FontSize::Small);
    surface.set_color(Color::Cyan);
    surface.draw_centered_text(&labels.label, cx, label_y)?;

    surface.set_font(FontSize::Large);
    surface.set_color(Color::Green);
    surface.draw_centered_text(&value, cx, cy)?;

    surface.set_font(FontSize::Small);
    surface.set_color(Color::Yellow);
    surface.draw_centered_text(&labels.footer, cx, footer_y)?;
    surface.present()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::drivers::mock::MockDriver;

    fn landscape() -> (Surface, std::sync::Arc<std::sync::Mutex<crate::display::drivers::mock::MockDriverState>>) {
        let driver = MockDriver::new_rgb(170, 320);
        let state = driver.state();
        let mut surface = Surface::new(Box::new(driver));
        surface.set_rotation(90).unwrap();
        (surface, state)
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(61234.5).as_str(), "61234.50");
        assert_eq!(format_price(0.0).as_str(), "0.00");
        assert_eq!(format_price(1.005e3).as_str(), "1005.00");
    }

    #[test]
    fn test_format_price_huge_value_does_not_panic() {
        let text = format_price(1.0e40);
        assert!(text.contains('e'));
    }

    #[test]
    fn test_price_screen_colors_by_row() {
        let (mut surface, state) = landscape();
        let labels = PriceLabels::new("BTC / EUR", 30);
        render_price(&mut surface, &labels, 61234.5).unwrap();

        let state = state.lock().unwrap();
        assert_eq!(state.frame_width, 320);
        // label band, price band, footer band
        assert!(state.count_color_in_rows(Color::Cyan.raw565(), 10, 30) > 0);
        assert!(state.count_color_in_rows(Color::Green.raw565(), 60, 110) > 0);
        assert!(state.count_color_in_rows(Color::Yellow.raw565(), 140, 160) > 0);
        assert_eq!(state.count_color(Color::Red.raw565()), 0);
    }

    #[test]
    fn test_error_screen_has_red_headline() {
        let (mut surface, state) = landscape();
        render_error(&mut surface, "HTTP 500").unwrap();

        let state = state.lock().unwrap();
        assert!(state.count_color_in_rows(Color::Red.raw565(), 60, 90) > 0);
        assert!(state.count_color_in_rows(Color::White.raw565(), 85, 110) > 0);
        assert_eq!(state.count_color(Color::Green.raw565()), 0);
    }

    #[test]
    fn test_status_redraw_replaces_previous_frame() {
        let (mut surface, state) = landscape();
        render_error(&mut surface, "boom").unwrap();
        render_status(&mut surface, "Connecting...", Color::White).unwrap();

        let state = state.lock().unwrap();
        assert_eq!(state.count_color(Color::Red.raw565()), 0);
        assert!(state.count_color(Color::White.raw565()) > 0);
        assert_eq!(state.flush_count, 2);
    }

    #[test]
    fn test_footer_reflects_interval() {
        assert_eq!(PriceLabels::new("X", 45).footer, "Update every 45s");
    }
}
