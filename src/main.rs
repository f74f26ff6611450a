// Copyright 2022 Florian Eich <florian.eich@gmail.com>
//
// This work is licensed under the Apache License, Version 2.0. You should have
// received a copy of this license along with the source code. If that is not
// the case, please find one at http://www.apache.org/licenses/LICENSE-2.0.

use deliverywatch::app_core::{util, AppCore};

use eyre::{eyre, Result};
use tokio::{signal, sync::mpsc};
use tracing::{error, info};


#[derive(Debug)]
enum ShutdownCause {
  AppStopped,
  AppFailed,
  CtrlC,
}

impl ShutdownCause {
  /// The process exits with an error status only if the app failed.
  fn outcome(&self) -> Result<()> {
    match self {
      ShutdownCause::AppFailed => Err(eyre!("AppCore failed, see log above")),
      ShutdownCause::AppStopped | ShutdownCause::CtrlC => Ok(()),
    }
  }
}


#[tokio::main]
async fn main() -> Result<()> {
  util::setup()?;
  info!("logging and tracing setup complete, deliverywatch starting up");

  // this channel is used by service tasks communicate back to main
  let (tx, mut rx) = mpsc::unbounded_channel();

  info!("Ctrl+C listener starting up...");
  let main_tx = tx.clone();
  tokio::spawn(async move {
    if let Err(e) = signal::ctrl_c().await {
      error!("unable to listen for Ctrl+C event: {}", e);
      return;
    }

    info!("received Ctrl+C signal");
    if let Err(e) = main_tx.send(ShutdownCause::CtrlC) {
      error!("unable to inform deliverywatch main task: {}", e);
    }
  });

  info!("reading command line arguments and config file...");
  let app_core = AppCore::init()?;
  info!(?app_core);

  info!("AppCore starting up...");
  let main_tx = tx.clone();
  let app_task = tokio::spawn(async move {
    match app_core.run().await {
      Ok(()) => {
        info!("AppCore has stopped");
        if let Err(e) = main_tx.send(ShutdownCause::AppStopped) {
          error!("unable to inform deliverywatch main task: {}", e);
        }
      }
      Err(e) => {
        error!("AppCore failed: {:?}", e);
        if let Err(e) = main_tx.send(ShutdownCause::AppFailed) {
          error!("unable to inform deliverywatch main task: {}", e);
        }
      }
    }
  });

  info!("deliverywatch up and running!");
  // `tx` stays alive in this scope, so the channel cannot close on us
  let cause = rx.recv().await;
  info!(?cause, "shutting down");
  if let Some(ShutdownCause::CtrlC) = cause {
    app_task.abort();
  }

  info!("deliverywatch has shut down");
  cause.map_or(Ok(()), |cause| cause.outcome())
}

// fin --------------------------------------------------------------------- //
