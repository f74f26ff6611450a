// Copyright 2022 Florian Eich <florian.eich@gmail.com>
//
// This work is licensed under the Apache License, Version 2.0. You should have
// received a copy of this license along with the source code. If that is not
// the case, please find one at http://www.apache.org/licenses/LICENSE-2.0.

use clap::Parser;
use eyre::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};


#[derive(Debug, Parser)]
#[clap(author, version, about)]
/// Uses the `clap` crate to parse runtime parameters from the command line.
pub struct CommandLineArgs {
  /// Set path for config file
  #[clap(short, long, default_value = "./conf/deliverywatch.toml")]
  pub config_path: String,
}


/// Initalizes backtracing and error handling capabilities and sets up the
/// tracing infrastructure for outputting logs from all components.
pub fn setup() -> Result<()> {
  // set up eyre with colors
  const BT_ENVVAR: &str = "RUST_LIB_BACKTRACE";
  if std::env::var(BT_ENVVAR).is_err() {
    std::env::set_var(BT_ENVVAR, "1")
  }
  color_eyre::install()?;

  // set up format layer with filtering for tracing. logs go to stderr so they
  // do not end up in the middle of the rendered deliveries on stdout.
  const LG_ENVVAR: &str = "RUST_LOG";
  if std::env::var(LG_ENVVAR).is_err() {
    std::env::set_var(LG_ENVVAR, "info")
  }
  let format_layer = fmt::layer().with_writer(std::io::stderr)
                                 .with_filter(EnvFilter::from_default_env());

  tracing_subscriber::registry().with(format_layer).init();

  Ok(())
}

// fin --------------------------------------------------------------------- //
