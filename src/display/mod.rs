/*
 *  display/mod.rs
 *
 *  PriceTick - what's it worth today
 *  (c) 2025-26 Stuart Hunter
 *
 *  Display subsystem - surface, screens and pluggable panel drivers
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

// Core trait definitions
pub mod traits;
pub mod error;
pub mod framebuffer;
pub mod factory;
pub mod color;

// Panel drivers (conditionally compiled based on features)
pub mod drivers;

// Declarative panel wiring table
pub mod panel;

// Layout system for adaptive UI
pub mod layout;

// Drawing surface and the screens drawn on it
pub mod surface;
pub mod screens;

// Re-exports for convenience
pub use traits::{DisplayDriver, DisplayCapabilities};
pub use error::{DisplayError, DisplayFactoryError};
pub use framebuffer::FrameBuffer;
pub use factory::{DisplayDriverFactory, BoxedDriver};
pub use layout::{LayoutConfig, FontSize};
pub use color::Color;
pub use panel::PanelConfig;
pub use surface::Surface;
pub use screens::{render_error, render_price, render_status, PriceLabels};
