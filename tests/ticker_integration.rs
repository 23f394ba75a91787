/*
 *  tests/ticker_integration.rs
 *
 *  PriceTick - what's it worth today
 *  (c) 2025-26 Stuart Hunter
 *
 *  End to end ticker runs against a fake panel, link and feed
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

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pricetick::clock::{Clock, ManualClock, SystemClock};
use pricetick::config::Config;
use pricetick::display::{
    Color, DisplayCapabilities, DisplayDriver, DisplayError, Surface,
};
use pricetick::feed::{HttpFetcher, HttpResponse};
use pricetick::network::{Credentials, LinkStatus, NetworkConnector};
use pricetick::{TickOutcome, Ticker, TickerError, TickerSettings};

/// Landscape RGB565 panel that keeps the last frame
struct FakePanel {
    caps: DisplayCapabilities,
    frame: Arc<Mutex<Vec<u8>>>,
}

impl FakePanel {
    fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
        let frame = Arc::new(Mutex::new(Vec::new()));
        let panel = Self {
            caps: DisplayCapabilities {
                width: 320,
                height: 170,
                supports_rotation: false,
                supports_brightness: false,
            },
            frame: Arc::clone(&frame),
        };
        (panel, frame)
    }
}

impl DisplayDriver for FakePanel {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.caps
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn set_brightness(&mut self, _value: u8) -> Result<(), DisplayError> {
        Err(DisplayError::UnsupportedOperation)
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.frame.lock().unwrap().iter_mut().for_each(|b| *b = 0);
        Ok(())
    }

    fn write_buffer(&mut self, buffer: &[u8]) -> Result<(), DisplayError> {
        *self.frame.lock().unwrap() = buffer.to_vec();
        Ok(())
    }
}

fn count(frame: &Arc<Mutex<Vec<u8>>>, color: Color) -> usize {
    let raw = color.raw565();
    frame
        .lock()
        .unwrap()
        .chunks_exact(2)
        .filter(|px| u16::from_le_bytes([px[0], px[1]]) == raw)
        .count()
}

#[derive(Clone, Default)]
struct Link {
    up: Arc<AtomicBool>,
}

impl NetworkConnector for Link {
    async fn begin(&mut self, _credentials: &Credentials) -> Result<(), TickerError> {
        Ok(())
    }

    async fn status(&mut self) -> LinkStatus {
        if self.up.load(Ordering::SeqCst) {
            LinkStatus::Connected
        } else {
            LinkStatus::Disconnected
        }
    }
}

/// Serves a fixed body, or a queue of them
#[derive(Clone, Default)]
struct Feed {
    queue: Arc<Mutex<VecDeque<(u16, String)>>>,
    calls: Arc<AtomicUsize>,
}

impl Feed {
    fn serve(&self, status: u16, body: &str) {
        self.queue.lock().unwrap().push_back((status, body.to_string()));
    }
}

impl HttpFetcher for Feed {
    async fn get(&self, url: &str) -> Result<HttpResponse, TickerError> {
        assert!(url.contains("vs_currencies=eur"));
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (status, body) = self
            .queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((200, r#"{"bitcoin":{"eur":42.0}}"#.to_string()));
        Ok(HttpResponse { status, body })
    }
}

fn settings() -> (Config, TickerSettings) {
    let cfg = Config::default();
    let settings = TickerSettings::from_config(&cfg);
    (cfg, settings)
}

#[tokio::test]
async fn test_price_then_api_error_then_recovery() {
    let (cfg, settings) = settings();
    let (panel, frame) = FakePanel::new();
    let link = Link::default();
    link.up.store(true, Ordering::SeqCst);
    let feed = Feed::default();
    feed.serve(200, r#"{"bitcoin":{"eur":61000.5}}"#);
    feed.serve(200, r#"{"bitcoin":{}}"#);
    feed.serve(200, r#"{"bitcoin":{"eur":60999.25}}"#);
    let clock = ManualClock::new();

    let mut ticker = Ticker::new(
        Surface::new(Box::new(panel)),
        link,
        feed.clone(),
        clock.clone(),
        cfg.feed().price_feed(),
        Credentials::default(),
        settings,
    );

    // no rotation or brightness support is not fatal
    ticker.startup().await.unwrap();
    assert_eq!(ticker.state().last_price, Some(61000.5));
    assert!(count(&frame, Color::Green) > 0);
    assert!(count(&frame, Color::Cyan) > 0);

    clock.advance(Duration::from_secs(30));
    assert_eq!(ticker.tick().await, TickOutcome::FetchFailed);
    assert_eq!(ticker.state().last_price, Some(61000.5));
    assert!(count(&frame, Color::Red) > 0);
    assert_eq!(count(&frame, Color::Green), 0);

    clock.advance(Duration::from_secs(30));
    assert_eq!(ticker.tick().await, TickOutcome::Updated(60999.25));
    assert_eq!(count(&frame, Color::Red), 0);
    assert_eq!(feed.calls.load(Ordering::SeqCst), 3);

    ticker.shutdown();
    assert_eq!(frame.lock().unwrap().iter().filter(|b| **b != 0).count(), 0);
}

#[tokio::test]
async fn test_dead_network_never_fetches() {
    let (cfg, settings) = settings();
    let (panel, frame) = FakePanel::new();
    let feed = Feed::default();
    let clock = ManualClock::new();

    let mut ticker = Ticker::new(
        Surface::new(Box::new(panel)),
        Link::default(),
        feed.clone(),
        clock.clone(),
        cfg.feed().price_feed(),
        Credentials::default(),
        settings,
    );

    ticker.startup().await.unwrap();
    // the whole connect timeout was waited out
    assert_eq!(clock.now(), Duration::from_secs(15));
    assert!(ticker.state().halted);

    for _ in 0..100 {
        assert_eq!(ticker.tick().await, TickOutcome::Halted);
    }
    assert_eq!(feed.calls.load(Ordering::SeqCst), 0);
    assert!(count(&frame, Color::Red) > 0);
}

#[tokio::test(start_paused = true)]
async fn test_run_keeps_cadence_on_tokio_time() {
    let (cfg, settings) = settings();
    let (panel, _frame) = FakePanel::new();
    let link = Link::default();
    link.up.store(true, Ordering::SeqCst);
    let feed = Feed::default();

    let mut ticker = Ticker::new(
        Surface::new(Box::new(panel)),
        link,
        feed.clone(),
        SystemClock::new(),
        cfg.feed().price_feed(),
        Credentials::default(),
        settings,
    );

    ticker.startup().await.unwrap();
    let _ = tokio::time::timeout(Duration::from_secs(100), ticker.run()).await;

    // startup fetch plus one every 30s of virtual time
    assert_eq!(feed.calls.load(Ordering::SeqCst), 4);
    assert_eq!(ticker.state().successes, 4);
    assert_eq!(ticker.state().last_price, Some(42.0));
}
