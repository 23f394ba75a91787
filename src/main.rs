/*
 *  main.rs
 *
 *  PriceTick - what's it worth today
 *  (c) 2025-26 Stuart Hunter
 *
 *  Entry point: load config, build the panel and run the ticker
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

use log::{error, info};
use env_logger::Env;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use pricetick::clock::SystemClock;
use pricetick::config;
use pricetick::display::{DisplayDriverFactory, Surface};
use pricetick::feed::ReqwestFetcher;
use pricetick::network::HostConnector;
use pricetick::{Ticker, TickerSettings};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Wait for SIGINT, SIGTERM or SIGHUP
#[cfg(unix)]
async fn signal_handler() -> Result<(), Box<dyn std::error::Error>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

/// Ctrl-C is all there is off unix
#[cfg(not(unix))]
async fn signal_handler() -> Result<(), Box<dyn std::error::Error>> {
    tokio::signal::ctrl_c().await?;
    info!("Ctrl-C received. Initiating graceful shutdown.");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::load()?;

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level()))
        .format_timestamp_secs()
        .init();

    info!("{} - what's it worth today", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let display_config = cfg.display();
    let driver = DisplayDriverFactory::create_from_config(&display_config)?;
    let surface = Surface::new(driver);

    let network = cfg.network();
    let feed = cfg.feed();
    let price_feed = feed.price_feed();
    info!("Feed: {} ({} in {})", feed.label(), price_feed.asset, price_feed.currency);

    let mut ticker = Ticker::new(
        surface,
        HostConnector::new(network.interface.clone(), network.connect_timeout()),
        ReqwestFetcher::new(feed.http_timeout())?,
        SystemClock::new(),
        price_feed,
        network.credentials(),
        TickerSettings::from_config(&cfg),
    );

    tokio::select! {
        _ = signal_handler() => {}
        result = async {
            ticker.startup().await?;
            ticker.run().await;
            Ok::<(), pricetick::TickerError>(())
        } => {
            if let Err(e) = result {
                error!("Ticker failed: {}", e);
                return Err(e.into());
            }
        }
    }

    info!("Main application exiting. Clearing display.");
    ticker.shutdown();
    Ok(())
}
