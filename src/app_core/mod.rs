// Copyright 2022 Florian Eich <florian.eich@gmail.com>
//
// This work is licensed under the Apache License, Version 2.0. You should have
// received a copy of this license along with the source code. If that is not
// the case, please find one at http://www.apache.org/licenses/LICENSE-2.0.

//! Contains the core functionality components of `deliverywatch`.
//!
//! This is the [`AppCore`] struct, which is read from the config file, sets up
//! the [`PollingFeed`](crate::feed::PollingFeed) and the
//! [`Display`](crate::display::Display) and runs them, plus the [`util`]
//! components it needs for that.

mod app_core;
pub mod util;

pub use app_core::AppCore;
