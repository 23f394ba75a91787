/*
 *  display/factory.rs
 *
 *  PriceTick - what's it worth today
 *  (c) 2025-26 Stuart Hunter
 *
 *  Factory pattern for display driver selection
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

use crate::config::{DisplayConfig, DriverKind};
use crate::display::error::DisplayFactoryError;
use crate::display::traits::DisplayDriver;
use log::info;

#[cfg(feature = "driver-fbdev")]
use crate::display::drivers::fbdev::FbdevDriver;

#[cfg(feature = "driver-snapshot")]
use crate::display::drivers::snapshot::SnapshotDriver;

#[cfg(feature = "driver-st7789")]
use crate::display::drivers::st7789::St7789Driver;

/// Type alias for boxed display driver trait objects
pub type BoxedDriver = Box<dyn DisplayDriver>;

/// Factory for creating display drivers from configuration
pub struct DisplayDriverFactory;

impl DisplayDriverFactory {
    /// Create a display driver from configuration
    ///
    /// With no driver named the framebuffer is used. A driver compiled out
    /// of this build is reported with the feature that enables it.
    pub fn create_from_config(config: &DisplayConfig) -> Result<BoxedDriver, DisplayFactoryError> {
        Self::validate_config(config)?;
        let kind = config.driver.clone().unwrap_or_default();
        info!("Creating {:?} display driver", kind);

        match kind {
            #[cfg(feature = "driver-fbdev")]
            DriverKind::Fbdev => Ok(Box::new(FbdevDriver::new(config)?)),

            #[cfg(feature = "driver-snapshot")]
            DriverKind::Snapshot => Ok(Box::new(SnapshotDriver::new(config)?)),

            #[cfg(feature = "driver-st7789")]
            DriverKind::St7789 => Ok(Box::new(St7789Driver::new(config)?)),

            #[allow(unreachable_patterns)]
            other => Err(DisplayFactoryError::DriverNotEnabled(other.feature_name())),
        }
    }

    /// Validate a configuration without creating a driver
    pub fn validate_config(config: &DisplayConfig) -> Result<(), DisplayFactoryError> {
        if let Some(rotation) = config.rotate_deg {
            if !matches!(rotation, 0 | 90 | 180 | 270) {
                return Err(DisplayFactoryError::ConfigError(format!(
                    "Invalid rotation angle: {} (must be 0, 90, 180, or 270)",
                    rotation
                )));
            }
        }
        if matches!(config.width, Some(0)) || matches!(config.height, Some(0)) {
            return Err(DisplayFactoryError::ConfigError("width/height must be > 0".to_string()));
        }
        if let Some(panel) = config.panel.as_ref() {
            panel.validate().map_err(DisplayFactoryError::ConfigError)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_config_invalid_rotation() {
        let config = DisplayConfig {
            rotate_deg: Some(45),
            ..Default::default()
        };
        assert!(DisplayDriverFactory::validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_zero_width() {
        let config = DisplayConfig {
            width: Some(0),
            ..Default::default()
        };
        assert!(DisplayDriverFactory::validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_bad_panel_table() {
        let mut panel = crate::display::panel::PanelConfig::default();
        panel.bus.pin_rd = panel.bus.pin_wr;
        let config = DisplayConfig {
            panel: Some(panel),
            ..Default::default()
        };
        assert!(matches!(
            DisplayDriverFactory::validate_config(&config),
            Err(DisplayFactoryError::ConfigError(_))
        ));
    }

    #[cfg(feature = "driver-snapshot")]
    #[test]
    fn test_create_snapshot_driver() {
        let config = DisplayConfig {
            driver: Some(DriverKind::Snapshot),
            width: Some(170),
            height: Some(320),
            device: Some(std::env::temp_dir().join("pricetick-factory.ppm").to_string_lossy().into_owned()),
            ..Default::default()
        };
        let driver = DisplayDriverFactory::create_from_config(&config).unwrap();
        assert_eq!(driver.dimensions(), (170, 320));
    }

    #[cfg(not(feature = "driver-st7789"))]
    #[test]
    fn test_disabled_driver_names_feature() {
        let config = DisplayConfig {
            driver: Some(DriverKind::St7789),
            ..Default::default()
        };
        match DisplayDriverFactory::create_from_config(&config) {
            Err(DisplayFactoryError::DriverNotEnabled(feature)) => assert_eq!(feature, "driver-st7789"),
            Err(e) => panic!("unexpected error {}", e),
            Ok(_) => panic!("st7789 should not be available"),
        }
    }
}
