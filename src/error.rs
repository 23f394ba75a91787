/*
 *  error.rs
 *
 *  PriceTick - what's it worth today
 *  (c) 2025-26 Stuart Hunter
 *
 *  Ticker error taxonomy
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

use std::time::Duration;
use thiserror::Error;

use crate::display::error::DisplayError;

/// Everything that can end a tick early
///
/// All variants are handled the same way by the loop: log, show the
/// error screen, keep the last price.
#[derive(Debug, Error)]
pub enum TickerError {
    #[error("network link not up after {timeout:?}")]
    Connectivity { timeout: Duration },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP status {0}")]
    HttpStatus(u16),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("display error: {0}")]
    Display(#[from] DisplayError),
}

impl TickerError {
    /// Short form for the error screen detail line
    pub fn short(&self) -> String {
        match self {
            TickerError::Connectivity { .. } => "WiFi failed".to_string(),
            TickerError::Transport(_) => "HTTP error".to_string(),
            TickerError::HttpStatus(code) => format!("HTTP {}", code),
            TickerError::Decode(_) => "API error".to_string(),
            TickerError::Display(_) => "Display error".to_string(),
        }
    }
}

impl From<reqwest::Error> for TickerError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return TickerError::HttpStatus(status.as_u16());
        }
        TickerError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for TickerError {
    fn from(err: serde_json::Error) -> Self {
        TickerError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_forms() {
        assert_eq!(TickerError::HttpStatus(500).short(), "HTTP 500");
        assert_eq!(TickerError::Decode("x".into()).short(), "API error");
        assert_eq!(
            TickerError::Connectivity { timeout: Duration::from_secs(15) }.short(),
            "WiFi failed"
        );
    }

    #[test]
    fn test_json_error_maps_to_decode() {
        let err: TickerError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, TickerError::Decode(_)));
    }

    #[test]
    fn test_display_error_is_source() {
        use std::error::Error;
        let err: TickerError = DisplayError::UnsupportedOperation.into();
        assert!(err.source().is_some());
    }
}
