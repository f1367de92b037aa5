/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-dot-]browne[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Static description of the trading pools a token migrated through.
//!
//! The dashboard charts one token across several pools; each pool covers an
//! interval of days and migrations between pools happen at fixed instants.
//! These records are read-only once loaded.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const GECKOTERMINAL_BASE_URL: &str = "https://api.geckoterminal.com/api/v2";

/// One trading pool and the days it was the token's primary market
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
  /// Short key used in charts and file names
  pub key: String,

  /// Pool address on the price API
  pub address: String,

  /// Human-readable pool name
  pub name: String,

  pub token_symbol: String,

  /// First active day, inclusive. `None` means active since launch
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub active_from: Option<NaiveDate>,

  /// Day the pool became inactive, exclusive. `None` means still active
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub active_until: Option<NaiveDate>,
}

impl PoolConfig {
  pub fn is_active_on(&self, date: NaiveDate) -> bool {
    let after_start = self.active_from.map_or(true, |from| date >= from);
    let before_end = self.active_until.map_or(true, |until| date < until);
    after_start && before_end
  }
}

/// Instant at which liquidity moved from one pool to the next
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationDate {
  pub name: String,

  /// Unix seconds
  pub timestamp: i64,
}

impl MigrationDate {
  pub fn at(&self) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(self.timestamp, 0)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingConfig {
  pub base_url: String,

  /// Chain the pools live on, e.g. "solana"
  pub network: String,

  /// Candle size requested from the price API ("minute", "hour", "day")
  pub timeframe: String,

  /// Pools in chronological order
  pub pools: Vec<PoolConfig>,

  pub migrations: Vec<MigrationDate>,
}

impl TrackingConfig {
  /// Load a tracking table from a JSON file
  pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let raw = std::fs::read_to_string(path)?;
    let config: TrackingConfig = serde_json::from_str(&raw)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<()> {
    if self.pools.is_empty() {
      return Err(Error::Config("tracking config lists no pools".to_string()));
    }
    for pool in &self.pools {
      if let (Some(from), Some(until)) = (pool.active_from, pool.active_until) {
        if from >= until {
          return Err(Error::Config(format!(
            "pool '{}' becomes inactive ({}) before it becomes active ({})",
            pool.key, until, from
          )));
        }
      }
    }
    for pair in self.pools.windows(2) {
      if let (Some(prev_from), Some(next_from)) = (pair[0].active_from, pair[1].active_from) {
        if prev_from > next_from {
          return Err(Error::Config(format!(
            "pools '{}' and '{}' are not in chronological order",
            pair[0].key, pair[1].key
          )));
        }
      }
    }
    Ok(())
  }

  /// The pool covering `date`, if any
  pub fn active_pool_on(&self, date: NaiveDate) -> Option<&PoolConfig> {
    self.pools.iter().find(|pool| pool.is_active_on(date))
  }
}

impl Default for TrackingConfig {
  /// M0N3Y (original) -> ZERA Raydium -> ZERA Meteora
  fn default() -> Self {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);
    Self {
      base_url: GECKOTERMINAL_BASE_URL.to_string(),
      network: "solana".to_string(),
      timeframe: "day".to_string(),
      pools: vec![
        PoolConfig {
          key: "mon3y".to_string(),
          address: "95AT5r4i85gfqeew2yR6BYFG8RLrY1d9ztPs7qrSKDVc".to_string(),
          name: "M0N3Y (Original)".to_string(),
          token_symbol: "M0N3Y".to_string(),
          active_from: None,
          active_until: date(2025, 10, 2),
        },
        PoolConfig {
          key: "zera_Raydium".to_string(),
          address: "Nn9VMHJTqgG9L9F8SP3GEuFWC5zVuHrADCwehh7N7Di".to_string(),
          name: "ZERA Raydium".to_string(),
          token_symbol: "ZERA".to_string(),
          active_from: date(2025, 10, 2),
          active_until: date(2025, 11, 5),
        },
        PoolConfig {
          key: "zera_Meteora".to_string(),
          address: "6oUJD1EHNVBNMeTpytmY2NxKWicz5C2JUbByUrHEsjhc".to_string(),
          name: "ZERA Meteora".to_string(),
          token_symbol: "ZERA".to_string(),
          active_from: date(2025, 11, 5),
          active_until: None,
        },
      ],
      migrations: vec![
        // October 2, 2025 00:00:00 UTC
        MigrationDate { name: "mon3y_to_zera".to_string(), timestamp: 1759363200 },
        // November 5, 2025 00:00:00 UTC
        MigrationDate { name: "zera_Raydium_to_Meteora".to_string(), timestamp: 1762300800 },
      ],
    }
  }
}
