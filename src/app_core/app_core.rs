// Copyright 2022 Florian Eich <florian.eich@gmail.com>
//
// This work is licensed under the Apache License, Version 2.0. You should have
// received a copy of this license along with the source code. If that is not
// the case, please find one at http://www.apache.org/licenses/LICENSE-2.0.

use super::util;
use crate::{classifier::{DeliveryClassifier, Thresholds},
            display::{Display, DisplayConfig, RenderSurface, TerminalSurface},
            feed::{FeedConfig, PollingFeed}};

use clap::Parser;
use eyre::{Result, WrapErr};
use serde::Deserialize;
use std::{fs, io};
use tokio::task::JoinError;
use tracing::info;


enum StopCause<S> {
  Feed(Result<()>),
  Display(Result<Result<S>, JoinError>),
}


#[derive(Clone, Debug, PartialEq, Deserialize)]
/// Deserialized from config file. Initializes core elements of
/// `deliverywatch`.
pub struct AppCore {
  feed:       FeedConfig,
  display:    DisplayConfig,
  #[serde(default)]
  thresholds: Thresholds,
}

impl AppCore {
  /// Method does not require parameters; options are taken from command line,
  /// parameters are parsed from a (required) config file.
  pub fn init() -> Result<Self> {
    let args = util::CommandLineArgs::parse();
    let raw = fs::read_to_string(&args.config_path)
      .wrap_err_with(|| format!("unable to read {}", args.config_path))?;

    Self::from_toml(&raw)
  }

  pub fn from_toml(raw: &str) -> Result<Self> {
    Ok(toml::from_str(raw)?)
  }

  /// Runs the application, polling the configured endpoint and rendering to
  /// stdout. Consumes the `AppCore` object.
  pub async fn run(self) -> Result<()> {
    let feed = PollingFeed::from_config(&self.feed)?;
    let surface = TerminalSurface::new(io::stdout(), self.display.colored);

    self.run_with(feed, surface).await
  }

  /// Runs the application with the given feed and surface until either of
  /// them stops. Consumes the `AppCore` object.
  ///
  /// If the feed stops, the display still renders whatever the feed published
  /// before it is done, and the feed's result is returned. If the display
  /// fails, the feed is cancelled.
  pub async fn run_with<S>(self, feed: PollingFeed, surface: S) -> Result<()>
    where S: RenderSurface + 'static
  {
    let classifier = DeliveryClassifier::new(self.thresholds);
    info!(thresholds = ?self.thresholds, "classifier set up");

    info!("starting display task...");
    let (display, snapshot_tx) =
      Display::init(self.display.channel_capacity, classifier, surface);
    let mut display_task = tokio::spawn(display.run());

    info!("starting feed task...");
    let mut feed_handle = feed.spawn(snapshot_tx);

    let stop_cause = tokio::select! {
      result = feed_handle.finished() => StopCause::Feed(result),
      result = &mut display_task => StopCause::Display(result),
    };

    match stop_cause {
      StopCause::Feed(result) => {
        info!("feed stopped, waiting for display to catch up...");
        display_task.await??;
        result
      }
      // the display only stops cleanly once the feed dropped its sender
      StopCause::Display(Ok(Ok(_))) => {
        info!("display stopped, waiting for feed to finish...");
        feed_handle.finished().await
      }
      StopCause::Display(result) => {
        info!("display failed, cancelling feed...");
        feed_handle.cancel();
        result?.map(|_| ())
      }
    }
  }
}

// fin --------------------------------------------------------------------- //
