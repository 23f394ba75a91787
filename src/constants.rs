//! This module contains global constants and compiled-in defaults.

use std::time::Duration;

// network
/// How long to wait for the link to come up.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 15_000;
/// Gap between link status polls while connecting.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;
/// How long the "connected" status stays on screen.
pub const DEFAULT_CONNECTED_HOLD_MS: u64 = 800;

// feed
/// CoinGecko simple price endpoint, BTC in EUR.
pub const DEFAULT_FEED_URL: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin&vs_currencies=eur";
pub const DEFAULT_ASSET: &str = "bitcoin";
pub const DEFAULT_CURRENCY: &str = "eur";
/// Top line of the price screen.
pub const DEFAULT_LABEL: &str = "BTC / EUR";
/// Whole-request HTTP timeout.
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;
/// TCP/TLS connect timeout, kept well under the request timeout.
pub const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const HTTP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// ticker
/// Minimum gap between fetch attempts.
pub const DEFAULT_FETCH_INTERVAL_SECS: u64 = 30;
/// Sleep between loop iterations while waiting for the next fetch.
pub const DEFAULT_IDLE_MS: u64 = 50;

// display
/// Native (portrait) size of the T-Display-S3 panel.
pub const DEFAULT_PANEL_WIDTH: u32 = 170;
pub const DEFAULT_PANEL_HEIGHT: u32 = 320;
/// Landscape, so the price gets the long edge.
pub const DEFAULT_ROTATE_DEG: u16 = 90;
pub const DEFAULT_BRIGHTNESS: u8 = 255;
pub const DEFAULT_FB_DEVICE: &str = "/dev/fb0";
pub const SYSFS_GRAPHICS: &str = "/sys/class/graphics";
pub const DEFAULT_SNAPSHOT_PATH: &str = "pricetick.ppm";

// status lines
pub const MSG_STARTING: &str = "PriceTick starting...";
pub const MSG_CONNECTING: &str = "Connecting WiFi...";
pub const MSG_CONNECTED: &str = "WiFi OK";
pub const MSG_FETCHING: &str = "Fetching price...";
pub const MSG_RECONNECTING: &str = "Reconnecting WiFi...";
pub const MSG_WIFI_FAILED: &str = "WiFi failed";
pub const MSG_WIFI_DOWN: &str = "WiFi down";
