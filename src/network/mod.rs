/*
 *  network/mod.rs
 *
 *  PriceTick - what's it worth today
 *  (c) 2025-26 Stuart Hunter
 *
 *  Network link: connector seam, retry policy, connect-with-timeout
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

pub mod host;

use log::{debug, info, warn};
use std::fmt;
use std::time::Duration;

use crate::clock::Clock;
use crate::error::TickerError;

pub use host::HostConnector;

/// Link state as reported by the connector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Connected,
    Disconnected,
}

/// WiFi credentials; all optional so a wired host needs none
#[derive(Clone, Default)]
pub struct Credentials {
    pub ssid: Option<String>,
    pub password: Option<String>,
    pub interface: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("ssid", &self.ssid)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("interface", &self.interface)
            .finish()
    }
}

/// Fixed-delay status polling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    /// Enough attempts at `delay` apart to cover `timeout`
    pub fn from_timeout(timeout: Duration, delay: Duration) -> Self {
        let delay = delay.max(Duration::from_millis(1));
        let attempts = timeout.as_micros().div_ceil(delay.as_micros()).max(1);
        Self {
            max_attempts: u32::try_from(attempts).unwrap_or(u32::MAX),
            delay,
        }
    }

    /// Total wait the policy allows
    pub fn timeout(&self) -> Duration {
        self.delay * self.max_attempts
    }
}

/// Whatever brings the network link up
#[allow(async_fn_in_trait)]
pub trait NetworkConnector {
    /// Start joining the network; does not wait for the link
    async fn begin(&mut self, credentials: &Credentials) -> Result<(), TickerError>;

    async fn status(&mut self) -> LinkStatus;
}

/// Start association then poll until the link is up or the policy runs out
///
/// The whole call, `begin` included, is bounded by `policy.timeout()` on
/// the injected clock. Status is checked before every wait and once more
/// when the time is up.
pub async fn connect_with_retry<N, C>(
    connector: &mut N,
    credentials: &Credentials,
    policy: &RetryPolicy,
    clock: &C,
) -> Result<(), TickerError>
where
    N: NetworkConnector,
    C: Clock,
{
    let timeout = policy.timeout();
    let start = clock.now();

    let begun = tokio::select! {
        biased;
        result = connector.begin(credentials) => Some(result),
        _ = clock.sleep(timeout) => None,
    };
    match begun {
        Some(Ok(())) => {}
        // the link may already be up by other means, keep polling
        Some(Err(e)) => warn!("Network begin failed: {}", e),
        None => warn!("Network begin still running after {:?}, abandoned", timeout),
    }

    for attempt in 1..=policy.max_attempts {
        if clock.now().saturating_sub(start) >= timeout {
            break;
        }
        if connector.status().await == LinkStatus::Connected {
            info!("Network up after {} poll(s)", attempt);
            return Ok(());
        }
        debug!("Link down, poll {}/{}", attempt, policy.max_attempts);
        clock.sleep(policy.delay).await;
    }

    if connector.status().await == LinkStatus::Connected {
        info!("Network up on final poll");
        return Ok(());
    }

    Err(TickerError::Connectivity { timeout })
}
