/*
 *  config.rs
 *
 *  PriceTick - what's it worth today
 *  (c) 2025-26 Stuart Hunter
 *
 *  Configuration: compiled-in defaults, YAML file, CLI overrides
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
use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}, time::Duration};
use thiserror::Error;

use crate::constants::*;
use crate::display::panel::PanelConfig;
use crate::feed::PriceFeed;
use crate::network::{Credentials, RetryPolicy};

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration. Every field is optional, defaults are
/// applied when the groups are read.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    pub network: Option<NetworkConfig>,
    pub feed: Option<FeedConfig>,
    pub ticker: Option<TickerConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub ssid: Option<String>,
    pub password: Option<String>,
    pub interface: Option<String>,      // e.g. "wlan0"
    pub connect_timeout_ms: Option<u64>,
    pub retry_delay_ms: Option<u64>,
    pub connected_hold_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FeedConfig {
    pub url: Option<String>,
    pub asset: Option<String>,          // top-level key, "bitcoin"
    pub currency: Option<String>,       // nested key, "eur"
    pub label: Option<String>,
    pub http_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TickerConfig {
    pub fetch_interval_secs: Option<u64>,
    pub idle_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    pub driver: Option<DriverKind>, // <- strongly-typed driver selection
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub rotate_deg: Option<u16>,
    pub brightness: Option<u8>,     // 0-255
    pub device: Option<String>,     // fb device, or snapshot file
    pub backlight: Option<String>,  // sysfs backlight dir
    pub panel: Option<PanelConfig>, // <- st7789 wiring table
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    #[default]
    Fbdev,
    Snapshot,
    St7789,
}

impl DriverKind {
    /// Cargo feature that compiles the driver in
    pub fn feature_name(&self) -> &'static str {
        match self {
            DriverKind::Fbdev => "driver-fbdev",
            DriverKind::Snapshot => "driver-snapshot",
            DriverKind::St7789 => "driver-st7789",
        }
    }
}

impl NetworkConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms.unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS))
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms.unwrap_or(DEFAULT_RETRY_DELAY_MS))
    }

    pub fn connected_hold(&self) -> Duration {
        Duration::from_millis(self.connected_hold_ms.unwrap_or(DEFAULT_CONNECTED_HOLD_MS))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from_timeout(self.connect_timeout(), self.retry_delay())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            ssid: self.ssid.clone(),
            password: self.password.clone(),
            interface: self.interface.clone(),
        }
    }
}

impl FeedConfig {
    pub fn price_feed(&self) -> PriceFeed {
        PriceFeed::new(
            self.url.as_deref().unwrap_or(DEFAULT_FEED_URL),
            self.asset.as_deref().unwrap_or(DEFAULT_ASSET),
            self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
        )
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(DEFAULT_LABEL)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms.unwrap_or(DEFAULT_HTTP_TIMEOUT_MS))
    }
}

impl TickerConfig {
    pub fn fetch_interval(&self) -> Duration {
        Duration::from_secs(self.fetch_interval_secs.unwrap_or(DEFAULT_FETCH_INTERVAL_SECS))
    }

    pub fn idle(&self) -> Duration {
        Duration::from_millis(self.idle_ms.unwrap_or(DEFAULT_IDLE_MS))
    }
}

impl DisplayConfig {
    pub fn rotation(&self) -> u16 {
        self.rotate_deg.unwrap_or(DEFAULT_ROTATE_DEG)
    }

    pub fn brightness(&self) -> u8 {
        self.brightness.unwrap_or(DEFAULT_BRIGHTNESS)
    }
}

impl Config {
    pub fn network(&self) -> NetworkConfig {
        self.network.clone().unwrap_or_default()
    }

    pub fn feed(&self) -> FeedConfig {
        self.feed.clone().unwrap_or_default()
    }

    pub fn ticker(&self) -> TickerConfig {
        self.ticker.clone().unwrap_or_default()
    }

    pub fn display(&self) -> DisplayConfig {
        self.display.clone().unwrap_or_default()
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "pricetick", version, about = "PriceTick - what's it worth today")]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Enable debug log level
    #[arg(long, short = 'v', alias = "verbose", action = ArgAction::SetTrue)]
    pub debug: bool,
    #[arg(long)]
    pub log_level: Option<String>,
    /// WiFi network to join (via NetworkManager)
    #[arg(long)]
    pub ssid: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    /// Interface that must carry the link, e.g. wlan0
    #[arg(long)]
    pub interface: Option<String>,
    #[arg(long, value_hint = ValueHint::Url)]
    pub feed_url: Option<String>,
    #[arg(long)]
    pub asset: Option<String>,
    #[arg(long)]
    pub currency: Option<String>,
    #[arg(long)]
    pub label: Option<String>,
    #[arg(long)]
    pub fetch_interval_secs: Option<u64>,
    #[arg(long, value_enum)]
    pub display_driver: Option<DriverKind>,
    #[arg(long)]
    pub display_device: Option<String>,
    #[arg(long)]
    pub display_width: Option<u32>,
    #[arg(long)]
    pub display_height: Option<u32>,
    #[arg(long)]
    pub display_rotate_deg: Option<u16>,
    #[arg(long)]
    pub display_brightness: Option<u8>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();
    let cfg = load_with(&cli)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Layer defaults, YAML and `cli`, then validate
pub fn load_with(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;
    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/pricetick/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/pricetick/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/pricetick.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["pricetick.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

pub fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Helper: replace `dst` only where `src` has a value
fn take<T>(dst: &mut Option<T>, src: Option<T>) {
    if src.is_some() { *dst = src; }
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    take(&mut dst.log_level, src.log_level);
    match (&mut dst.network, src.network) {
        (None, Some(c)) => dst.network = Some(c),
        (Some(d), Some(s)) => merge_network(d, s),
        _ => {}
    }
    match (&mut dst.feed, src.feed) {
        (None, Some(c)) => dst.feed = Some(c),
        (Some(d), Some(s)) => merge_feed(d, s),
        _ => {}
    }
    match (&mut dst.ticker, src.ticker) {
        (None, Some(c)) => dst.ticker = Some(c),
        (Some(d), Some(s)) => {
            take(&mut d.fetch_interval_secs, s.fetch_interval_secs);
            take(&mut d.idle_ms, s.idle_ms);
        }
        _ => {}
    }
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
}

fn merge_network(dst: &mut NetworkConfig, src: NetworkConfig) {
    take(&mut dst.ssid, src.ssid);
    take(&mut dst.password, src.password);
    take(&mut dst.interface, src.interface);
    take(&mut dst.connect_timeout_ms, src.connect_timeout_ms);
    take(&mut dst.retry_delay_ms, src.retry_delay_ms);
    take(&mut dst.connected_hold_ms, src.connected_hold_ms);
}

fn merge_feed(dst: &mut FeedConfig, src: FeedConfig) {
    take(&mut dst.url, src.url);
    take(&mut dst.asset, src.asset);
    take(&mut dst.currency, src.currency);
    take(&mut dst.label, src.label);
    take(&mut dst.http_timeout_ms, src.http_timeout_ms);
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    take(&mut dst.driver, src.driver);
    take(&mut dst.width, src.width);
    take(&mut dst.height, src.height);
    take(&mut dst.rotate_deg, src.rotate_deg);
    take(&mut dst.brightness, src.brightness);
    take(&mut dst.device, src.device);
    take(&mut dst.backlight, src.backlight);
    take(&mut dst.panel, src.panel);
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.debug {
        cfg.log_level = Some("debug".to_string());
    } else if cli.log_level.is_some() {
        cfg.log_level = cli.log_level.clone();
    }

    if cli.ssid.is_some() || cli.password.is_some() || cli.interface.is_some() {
        let network = cfg.network.get_or_insert_with(NetworkConfig::default);
        take(&mut network.ssid, cli.ssid.clone());
        take(&mut network.password, cli.password.clone());
        take(&mut network.interface, cli.interface.clone());
    }

    let any_feed = cli.feed_url.is_some()
        || cli.asset.is_some()
        || cli.currency.is_some()
        || cli.label.is_some();
    if any_feed {
        let feed = cfg.feed.get_or_insert_with(FeedConfig::default);
        take(&mut feed.url, cli.feed_url.clone());
        take(&mut feed.asset, cli.asset.clone());
        take(&mut feed.currency, cli.currency.clone());
        take(&mut feed.label, cli.label.clone());
    }

    if cli.fetch_interval_secs.is_some() {
        let ticker = cfg.ticker.get_or_insert_with(TickerConfig::default);
        ticker.fetch_interval_secs = cli.fetch_interval_secs;
    }

    let any_display = cli.display_driver.is_some()
        || cli.display_device.is_some()
        || cli.display_width.is_some()
        || cli.display_height.is_some()
        || cli.display_rotate_deg.is_some()
        || cli.display_brightness.is_some();
    if any_display {
        let display = cfg.display.get_or_insert_with(DisplayConfig::default);
        take(&mut display.driver, cli.display_driver);
        take(&mut display.device, cli.display_device.clone());
        take(&mut display.width, cli.display_width);
        take(&mut display.height, cli.display_height);
        take(&mut display.rotate_deg, cli.display_rotate_deg);
        take(&mut display.brightness, cli.display_brightness);
    }
}

/// Put any invariants here (required fields, ranges, etc.)
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let ticker = cfg.ticker();
    if ticker.fetch_interval().is_zero() {
        return Err(ConfigError::Validation("ticker fetch_interval_secs must be > 0".into()));
    }

    let network = cfg.network();
    if network.retry_delay().is_zero() {
        return Err(ConfigError::Validation("network retry_delay_ms must be > 0".into()));
    }
    if network.retry_delay() > network.connect_timeout() {
        return Err(ConfigError::Validation(
            "network retry_delay_ms must not exceed connect_timeout_ms".into(),
        ));
    }

    let feed = cfg.feed();
    let price_feed = feed.price_feed();
    if price_feed.url.trim().is_empty() {
        return Err(ConfigError::Validation("feed url must not be empty".into()));
    }
    if price_feed.asset.trim().is_empty() || price_feed.currency.trim().is_empty() {
        return Err(ConfigError::Validation("feed asset/currency must not be empty".into()));
    }
    if feed.http_timeout().is_zero() {
        return Err(ConfigError::Validation("feed http_timeout_ms must be > 0".into()));
    }

    if let Some(display) = cfg.display.as_ref() {
        if matches!(display.width, Some(0)) || matches!(display.height, Some(0)) {
            return Err(ConfigError::Validation("display width/height must be > 0".into()));
        }
        if let Some(rot) = display.rotate_deg {
            match rot {
                0 | 90 | 180 | 270 => {},
                _ => return Err(ConfigError::Validation("display rotate_deg must be 0|90|180|270".into()))
            }
        }
        if let Some(panel) = display.panel.as_ref() {
            panel.validate().map_err(ConfigError::Validation)?;
        }
    }
    Ok(())
}
