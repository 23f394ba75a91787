/*
 *  network/host.rs
 *
 *  PriceTick - what's it worth today
 *  (c) 2025-26 Stuart Hunter
 *
 *  Host network connector - NetworkManager to join, interface addresses for status
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

use local_ip_address::list_afinet_netifas;
use log::{debug, info, warn};
use std::net::IpAddr;
use std::time::Duration;
use tokio::process::Command;

use super::{Credentials, LinkStatus, NetworkConnector};
use crate::error::TickerError;

/// Is there a usable IPv4 address, on `interface` if one is named
pub fn link_up(ifaces: &[(String, IpAddr)], interface: Option<&str>) -> bool {
    ifaces.iter().any(|(name, ip)| {
        let usable = ip.is_ipv4() && !ip.is_loopback();
        match interface {
            Some(wanted) => usable && name == wanted,
            None => usable,
        }
    })
}

/// `nmcli` arguments for joining `ssid`, giving up after `wait`
pub fn nmcli_args(credentials: &Credentials, wait: Duration) -> Option<Vec<String>> {
    let ssid = credentials.ssid.as_ref()?;
    let mut args = vec![
        "--wait".to_string(),
        wait.as_secs().max(1).to_string(),
        "device".to_string(),
        "wifi".to_string(),
        "connect".to_string(),
        ssid.clone(),
    ];
    if let Some(password) = credentials.password.as_ref() {
        args.extend(["password".to_string(), password.clone()]);
    }
    if let Some(interface) = credentials.interface.as_ref() {
        args.extend(["ifname".to_string(), interface.clone()]);
    }
    Some(args)
}

/// Connector for a Linux host
///
/// With no SSID configured `begin` does nothing and the link is whatever
/// the host already has (ethernet, an existing WiFi profile).
#[derive(Debug, Clone)]
pub struct HostConnector {
    interface: Option<String>,
    /// Passed to nmcli so it never outlives the connect timeout
    wait: Duration,
}

impl HostConnector {
    pub fn new(interface: Option<String>, wait: Duration) -> Self {
        Self { interface, wait }
    }
}

impl NetworkConnector for HostConnector {
    async fn begin(&mut self, credentials: &Credentials) -> Result<(), TickerError> {
        let Some(args) = nmcli_args(credentials, self.wait) else {
            debug!("No SSID configured, using the existing link");
            return Ok(());
        };
        info!("Joining WiFi {:?}", credentials.ssid.as_deref().unwrap_or_default());

        // dropped when the connect timeout abandons us
        let output = Command::new("nmcli")
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| TickerError::Transport(format!("nmcli: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TickerError::Transport(format!("nmcli: {}", stderr.trim())));
        }
        Ok(())
    }

    async fn status(&mut self) -> LinkStatus {
        match list_afinet_netifas() {
            Ok(ifaces) if link_up(&ifaces, self.interface.as_deref()) => LinkStatus::Connected,
            Ok(_) => LinkStatus::Disconnected,
            Err(e) => {
                warn!("Unable to list interfaces: {}", e);
                LinkStatus::Disconnected
            }
        }
    }
}
