/*
 *  feed/mod.rs
 *
 *  PriceTick - what's it worth today
 *  (c) 2025-26 Stuart Hunter
 *
 *  Price feed - fetch and decode {"<asset>":{"<currency>":<number>}}
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

pub mod http;

use log::{debug, warn};
use serde_json::Value as JsonValue;

use crate::error::TickerError;

pub use http::{HttpFetcher, HttpResponse, ReqwestFetcher};

/// One asset quoted in one currency from a simple-price endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct PriceFeed {
    pub url: String,
    pub asset: String,
    pub currency: String,
}

impl PriceFeed {
    pub fn new(url: impl Into<String>, asset: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            asset: asset.into(),
            currency: currency.into(),
        }
    }

    /// Pull `<asset>.<currency>` out of a response body
    pub fn decode(&self, body: &str) -> Result<f64, TickerError> {
        let doc: JsonValue = serde_json::from_str(body)?;
        let quotes = doc
            .get(&self.asset)
            .ok_or_else(|| TickerError::Decode(format!("field {} missing", self.asset)))?;
        let price = quotes
            .get(&self.currency)
            .ok_or_else(|| TickerError::Decode(format!("field {}.{} missing", self.asset, self.currency)))?;
        price
            .as_f64()
            .ok_or_else(|| TickerError::Decode(format!("{}.{} is not a number: {}", self.asset, self.currency, price)))
    }

    /// GET the endpoint; only 200 counts
    pub async fn fetch<F: HttpFetcher>(&self, fetcher: &F) -> Result<f64, TickerError> {
        let response = fetcher.get(&self.url).await?;
        if response.status != 200 {
            warn!("Price feed returned HTTP {}", response.status);
            return Err(TickerError::HttpStatus(response.status));
        }
        let price = self.decode(&response.body)?;
        debug!("{}/{}: {}", self.asset, self.currency, price);
        Ok(price)
    }
}
