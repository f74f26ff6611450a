// Copyright 2022 Florian Eich <florian.eich@gmail.com>
//
// This work is licensed under the Apache License, Version 2.0. You should have
// received a copy of this license along with the source code. If that is not
// the case, please find one at http://www.apache.org/licenses/LICENSE-2.0.

//! Retrieval of delivery records.
//!
//! A [`DeliverySource`] yields the complete current list of deliveries on
//! demand. The [`PollingFeed`] asks it for that list once per cycle and
//! publishes every successful result as a [`Snapshot`] to the
//! [`Display`](crate::display::Display).

mod http_source;
mod polling_feed;

pub use http_source::HttpSource;
pub use polling_feed::{FeedConfig, FeedHandle, PollingFeed};

// fin re-exports ---------------------------------------------------------- //

use crate::delivery::DeliveryRecord;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::warn;


/// Complete list of deliveries from one poll cycle, newest first.
pub type Snapshot = Vec<DeliveryRecord>;

/// Helper type for the sender half the [`PollingFeed`] publishes on.
pub type SnapshotTx = mpsc::Sender<Snapshot>;

/// Helper type for the receiver half the display listens on.
pub type SnapshotRx = mpsc::Receiver<Snapshot>;


#[derive(Debug, Error)]
/// Ways a single fetch of the delivery list can fail.
pub enum FetchError {
  #[error("request to delivery endpoint failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("delivery endpoint answered with status {0}")]
  Status(StatusCode),
  #[error("unable to decode delivery list: {0}")]
  Decode(#[from] serde_json::Error),
}


/// Anything that can produce the current list of deliveries.
#[async_trait]
pub trait DeliverySource: fmt::Debug + Send + Sync {
  async fn fetch(&self) -> Result<Vec<DeliveryRecord>, FetchError>;
}


#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
/// Decides what a failed fetch means for the [`PollingFeed`].
pub enum FetchErrorPolicy {
  /// Log the failure and wait for the next cycle. The display keeps showing
  /// the last successful snapshot.
  #[default]
  #[serde(rename = "log")]
  LogAndIgnore,
  /// Stop the feed and hand the error up.
  #[serde(rename = "escalate")]
  Escalate,
}

impl FetchErrorPolicy {
  /// Returns `Ok(())` if polling should go on.
  pub fn handle(&self, err: FetchError) -> Result<(), FetchError> {
    match self {
      FetchErrorPolicy::LogAndIgnore => {
        warn!("fetching deliveries failed, skipping cycle: {}", err);
        Ok(())
      }
      FetchErrorPolicy::Escalate => Err(err),
    }
  }
}

// fin --------------------------------------------------------------------- //
