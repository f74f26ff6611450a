// Copyright 2022 Florian Eich <florian.eich@gmail.com>
//
// This work is licensed under the Apache License, Version 2.0. You should have
// received a copy of this license along with the source code. If that is not
// the case, please find one at http://www.apache.org/licenses/LICENSE-2.0.

use super::{DeliverySource, FetchErrorPolicy, HttpSource, SnapshotTx};
use crate::delivery;

use eyre::{ensure, Result};
use serde::Deserialize;
use tokio::{task::JoinHandle,
            time::{self, Duration, Instant, MissedTickBehavior}};
use tracing::{debug, info};


#[derive(Clone, Debug, PartialEq, Deserialize)]
/// Holds the `[feed]` section of the config file.
pub struct FeedConfig {
  pub endpoint:         String,
  pub millis_per_cycle: u64,
  #[serde(default)]
  pub on_fetch_error:   FetchErrorPolicy,
}


#[derive(Debug)]
/// Asks a [`DeliverySource`] for the current deliveries once per cycle and
/// publishes each successful result, sorted newest first, to the display.
pub struct PollingFeed {
  source: Box<dyn DeliverySource>,
  period: Duration,
  policy: FetchErrorPolicy,
}

impl PollingFeed {
  pub fn new(source: Box<dyn DeliverySource>,
             period: Duration,
             policy: FetchErrorPolicy)
             -> Self {
    Self { source,
           period,
           policy }
  }

  /// Sets up a feed polling an [`HttpSource`] as described by `config`.
  pub fn from_config(config: &FeedConfig) -> Result<Self> {
    let source = HttpSource::new(&config.endpoint)?;

    Ok(Self::new(Box::new(source),
                 Duration::from_millis(config.millis_per_cycle),
                 config.on_fetch_error))
  }

  /// Runs the [`PollingFeed`] until the receiving end of `snapshot_tx` is
  /// gone or the [`FetchErrorPolicy`] gives up. Consumes the original object.
  ///
  /// The first fetch happens one period after start. Fetches are sequential:
  /// a tick that comes due while a fetch is still running is delayed until
  /// that fetch has resolved.
  pub async fn run(self, snapshot_tx: SnapshotTx) -> Result<()> {
    ensure!(!self.period.is_zero(), "polling period must not be zero");

    let mut interval = time::interval_at(Instant::now() + self.period,
                                         self.period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
      interval.tick().await;

      match self.source.fetch().await {
        Ok(records) => {
          let snapshot = delivery::newest_first(records);
          debug!("publishing snapshot of {} deliveries", snapshot.len());

          if snapshot_tx.send(snapshot).await.is_err() {
            info!("display has gone away, feed stopping");
            return Ok(());
          }
        }
        Err(err) => self.policy.handle(err)?,
      }
    }
  }

  /// Starts the feed on its own task. The task lives exactly as long as the
  /// returned [`FeedHandle`].
  pub fn spawn(self, snapshot_tx: SnapshotTx) -> FeedHandle {
    info!("feed polling every {:?}", self.period);
    FeedHandle { task: tokio::spawn(self.run(snapshot_tx)) }
  }
}


#[derive(Debug)]
/// Owns the task of a running [`PollingFeed`]. Dropping the handle aborts the
/// task.
pub struct FeedHandle {
  task: JoinHandle<Result<()>>,
}

impl FeedHandle {
  /// Waits for the feed to stop on its own and returns its result. Must not be
  /// awaited again once it has resolved.
  pub async fn finished(&mut self) -> Result<()> {
    (&mut self.task).await?
  }

  pub fn cancel(self) {
    self.task.abort();
  }
}

impl Drop for FeedHandle {
  fn drop(&mut self) {
    self.task.abort();
  }
}

// fin --------------------------------------------------------------------- //
