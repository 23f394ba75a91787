/*
 *  ticker.rs
 *
 *  PriceTick - what's it worth today
 *  (c) 2025-26 Stuart Hunter
 *
 *  The ticker loop: connect, fetch, render on a fixed cadence
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

use chrono::{DateTime, Local};
use log::{debug, error, info, warn};
use std::time::Duration;

use crate::clock::Clock;
use crate::config::Config;
use crate::constants::*;
use crate::display::{render_error, render_price, render_status, Color, PriceLabels, Surface};
use crate::error::TickerError;
use crate::feed::{HttpFetcher, PriceFeed};
use crate::network::{connect_with_retry, Credentials, LinkStatus, NetworkConnector, RetryPolicy};

/// Resolved timing and presentation settings
#[derive(Debug, Clone)]
pub struct TickerSettings {
    pub fetch_interval: Duration,
    pub idle: Duration,
    pub retry: RetryPolicy,
    pub connected_hold: Duration,
    pub rotate_deg: u16,
    pub brightness: u8,
    pub labels: PriceLabels,
}

impl TickerSettings {
    pub fn from_config(cfg: &Config) -> Self {
        let network = cfg.network();
        let ticker = cfg.ticker();
        let display = cfg.display();
        let fetch_interval = ticker.fetch_interval();
        Self {
            fetch_interval,
            idle: ticker.idle(),
            retry: network.retry_policy(),
            connected_hold: network.connected_hold(),
            rotate_deg: display.rotation(),
            brightness: display.brightness(),
            labels: PriceLabels::new(cfg.feed().label(), fetch_interval.as_secs()),
        }
    }
}

/// Everything the loop remembers between iterations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickerState {
    /// Clock time of the last fetch attempt
    pub last_fetch: Option<Duration>,
    /// Most recent successfully fetched value
    pub last_price: Option<f64>,
    /// Wall time of the last successful fetch, for the log
    pub last_update: Option<DateTime<Local>>,
    /// Startup never got a link; nothing more will be fetched
    pub halted: bool,
    pub fetch_attempts: u64,
    pub successes: u64,
    pub failures: u64,
}

impl TickerState {
    /// Has `interval` passed since the last attempt
    pub fn fetch_due(&self, now: Duration, interval: Duration) -> bool {
        match self.last_fetch {
            Some(last) => now.saturating_sub(last) >= interval,
            None => true,
        }
    }

    pub fn record_attempt(&mut self, now: Duration) {
        self.last_fetch = Some(now);
        self.fetch_attempts += 1;
    }

    pub fn record_success(&mut self, price: f64) {
        self.last_price = Some(price);
        self.last_update = Some(Local::now());
        self.successes += 1;
    }

    /// Failures leave the stored price alone
    pub fn record_failure(&mut self) {
        self.failures += 1;
    }
}

/// What one call to `tick()` did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Interval not reached yet
    Idle,
    /// Startup failed, the loop only idles
    Halted,
    /// Link could not be restored; tried again next interval
    ReconnectFailed,
    FetchFailed,
    Updated(f64),
}

/// The loop driving object
///
/// Owns the surface, the collaborators and the `TickerState`. Every
/// decision goes through the injected clock.
pub struct Ticker<N, F, C> {
    surface: Surface,
    connector: N,
    fetcher: F,
    clock: C,
    feed: PriceFeed,
    credentials: Credentials,
    settings: TickerSettings,
    state: TickerState,
}

impl<N, F, C> Ticker<N, F, C>
where
    N: NetworkConnector,
    F: HttpFetcher,
    C: Clock,
{
    pub fn new(
        surface: Surface,
        connector: N,
        fetcher: F,
        clock: C,
        feed: PriceFeed,
        credentials: Credentials,
        settings: TickerSettings,
    ) -> Self {
        Self {
            surface,
            connector,
            fetcher,
            clock,
            feed,
            credentials,
            settings,
            state: TickerState::default(),
        }
    }

    pub fn state(&self) -> &TickerState {
        &self.state
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Bring up the panel, join the network and show the first price
    ///
    /// Only a panel that will not initialise is an error. A network that
    /// never comes up leaves the ticker halted on an error screen.
    pub async fn startup(&mut self) -> Result<(), TickerError> {
        self.surface.init()?;
        if let Err(e) = self.surface.set_rotation(self.settings.rotate_deg) {
            warn!("Rotation {} not applied: {}", self.settings.rotate_deg, e);
        }
        if let Err(e) = self.surface.set_brightness(self.settings.brightness) {
            warn!("Brightness not applied: {}", e);
        }
        self.surface.clear();
        self.show_status(MSG_STARTING, Color::Cyan);

        self.show_status(MSG_CONNECTING, Color::Yellow);
        let connected = connect_with_retry(
            &mut self.connector,
            &self.credentials,
            &self.settings.retry,
            &self.clock,
        )
        .await;
        if let Err(e) = connected {
            error!("Startup connect failed: {}", e);
            self.show_error(MSG_WIFI_FAILED);
            self.state.halted = true;
            return Ok(());
        }

        self.announce_connected().await;

        self.show_status(MSG_FETCHING, Color::Yellow);
        self.fetch_and_render().await;
        Ok(())
    }

    /// One loop iteration
    pub async fn tick(&mut self) -> TickOutcome {
        if self.state.halted {
            self.clock.sleep(self.settings.idle).await;
            return TickOutcome::Halted;
        }

        let now = self.clock.now();
        if !self.state.fetch_due(now, self.settings.fetch_interval) {
            self.clock.sleep(self.settings.idle).await;
            return TickOutcome::Idle;
        }

        if self.connector.status().await != LinkStatus::Connected {
            warn!("Link lost, reconnecting");
            self.show_status(MSG_RECONNECTING, Color::Orange);
            let reconnected = connect_with_retry(
                &mut self.connector,
                &self.credentials,
                &self.settings.retry,
                &self.clock,
            )
            .await;
            if let Err(e) = reconnected {
                error!("Reconnect failed: {}", e);
                // counts as an attempt so the next try waits a full interval
                self.state.record_attempt(now);
                self.state.record_failure();
                self.show_error(MSG_WIFI_DOWN);
                return TickOutcome::ReconnectFailed;
            }
            self.announce_connected().await;
        }

        self.fetch_and_render().await
    }

    /// Tick forever
    pub async fn run(&mut self) {
        info!(
            "Ticker running: every {:?}, idle {:?}",
            self.settings.fetch_interval, self.settings.idle
        );
        loop {
            let outcome = self.tick().await;
            if outcome != TickOutcome::Idle && outcome != TickOutcome::Halted {
                debug!("tick: {:?}", outcome);
            }
        }
    }

    /// Blank the panel on the way out
    pub fn shutdown(&mut self) {
        if let Err(e) = self.surface.blank() {
            warn!("Failed to clear display on shutdown: {}", e);
        }
        info!(
            "Ticker stopped after {} fetch(es), {} ok, {} failed",
            self.state.fetch_attempts, self.state.successes, self.state.failures
        );
    }

    async fn fetch_and_render(&mut self) -> TickOutcome {
        self.state.record_attempt(self.clock.now());

        match self.feed.fetch(&self.fetcher).await {
            Ok(price) => {
                self.state.record_success(price);
                info!("{} = {:.2}", self.settings.labels.label, price);
                if let Err(e) = render_price(&mut self.surface, &self.settings.labels, price) {
                    error!("Failed to render price: {}", e);
                }
                TickOutcome::Updated(price)
            }
            Err(e) => {
                self.state.record_failure();
                match self.state.last_update {
                    Some(at) => error!("Price fetch failed: {} (last good {})", e, at.format("%H:%M:%S")),
                    None => error!("Price fetch failed: {}", e),
                }
                self.show_error(&e.short());
                TickOutcome::FetchFailed
            }
        }
    }

    /// Hold the link OK status long enough to read
    async fn announce_connected(&mut self) {
        self.show_status(MSG_CONNECTED, Color::Green);
        self.clock.sleep(self.settings.connected_hold).await;
    }

    fn show_status(&mut self, message: &str, color: Color) {
        if let Err(e) = render_status(&mut self.surface, message, color) {
            error!("Failed to render status '{}': {}", message, e);
        }
    }

    fn show_error(&mut self, detail: &str) {
        if let Err(e) = render_error(&mut self.surface, detail) {
            error!("Failed to render error '{}': {}", detail, e);
        }
    }
}
