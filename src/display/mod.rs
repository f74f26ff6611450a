// Copyright 2022 Florian Eich <florian.eich@gmail.com>
//
// This work is licensed under the Apache License, Version 2.0. You should have
// received a copy of this license along with the source code. If that is not
// the case, please find one at http://www.apache.org/licenses/LICENSE-2.0.

//! The [`Display`] owns the list of deliveries currently shown and renders it
//! onto a [`RenderSurface`] whenever the feed publishes a new snapshot.

mod surface;

pub use surface::{RenderSurface, RenderedDelivery, TerminalSurface};

// fin re-exports ---------------------------------------------------------- //

use crate::{classifier::DeliveryClassifier,
            delivery::DeliveryRecord,
            feed::{Snapshot, SnapshotRx, SnapshotTx}};

use chrono::{DateTime, Utc};
use eyre::Result;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, info};


#[derive(Clone, Debug, PartialEq, Deserialize)]
/// Holds the `[display]` section of the config file.
pub struct DisplayConfig {
  pub channel_capacity: usize,
  #[serde(default = "colored_by_default")]
  pub colored:          bool,
}

fn colored_by_default() -> bool {
  true
}


#[derive(Debug)]
/// Receives snapshots from the [`PollingFeed`](crate::feed::PollingFeed),
/// keeps the latest one as the list of records on display and renders it.
///
/// The record list is only ever replaced as a whole, and only by the display
/// itself.
pub struct Display<S> {
  classifier:  DeliveryClassifier,
  surface:     S,
  records:     Snapshot,
  snapshot_rx: SnapshotRx,
}

impl<S: RenderSurface> Display<S> {
  /// Creates the display along with the sender the feed publishes on.
  pub fn init(channel_capacity: usize,
              classifier: DeliveryClassifier,
              surface: S)
              -> (Self, SnapshotTx) {
    // tokio refuses zero capacity channels
    let (snapshot_tx, snapshot_rx) = mpsc::channel(channel_capacity.max(1));
    info!("setup of Display channel successful");

    (Self { classifier,
            surface,
            records: Vec::new(),
            snapshot_rx },
     snapshot_tx)
  }

  /// Records currently on display, newest first.
  pub fn records(&self) -> &[DeliveryRecord] {
    &self.records
  }

  /// Swaps the records on display for `snapshot`.
  pub fn replace(&mut self, snapshot: Snapshot) {
    debug!("replacing {} deliveries with {}",
           self.records.len(),
           snapshot.len());
    self.records = snapshot;
  }

  /// Classifies every record on display as of `now` and renders the result.
  pub fn render(&mut self, now: DateTime<Utc>) -> Result<()> {
    let classifier = self.classifier;
    let deliveries =
      self.records
          .iter()
          .map(|record| RenderedDelivery { record,
                                           zone: classifier.zone(record, now) })
          .collect::<Vec<_>>();

    self.surface.render(&deliveries, now)
  }

  /// Runs the [`Display`] until every sender of its snapshot channel is gone
  /// or rendering fails. Consumes the original object and hands the surface
  /// back on a clean stop.
  pub async fn run(mut self) -> Result<S> {
    while let Some(snapshot) = self.snapshot_rx.recv().await {
      self.replace(snapshot);
      self.render(Utc::now())?;
    }

    info!("feed has gone away, display stopping");
    Ok(self.surface)
  }
}

// fin --------------------------------------------------------------------- //
