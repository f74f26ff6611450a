// Copyright 2022 Florian Eich <florian.eich@gmail.com>
//
// This work is licensed under the Apache License, Version 2.0. You should have
// received a copy of this license along with the source code. If that is not
// the case, please find one at http://www.apache.org/licenses/LICENSE-2.0.

//! `deliverywatch` - keeps an eye on deliveries.
//!
//! Polls a delivery endpoint and shows every delivery as a red or green block:
//! red when the delivery is both slow (more than 30 seconds since it was
//! created) and far (more than 5km between merchant and customer), green
//! otherwise.
//!
//! The numeric core lives in [`geo`], [`elapsed`] and [`classifier`]. The
//! [`feed`] fetches deliveries, the [`display`] shows them and the
//! [`app_core`] ties both together.

pub mod app_core;
pub mod classifier;
pub mod delivery;
pub mod display;
pub mod elapsed;
pub mod feed;
pub mod geo;
