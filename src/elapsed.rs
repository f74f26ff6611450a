// Copyright 2022 Florian Eich <florian.eich@gmail.com>
//
// This work is licensed under the Apache License, Version 2.0. You should have
// received a copy of this license along with the source code. If that is not
// the case, please find one at http://www.apache.org/licenses/LICENSE-2.0.

use chrono::{DateTime, Utc};
use std::fmt;


const MILLIS_PER_MINUTE: i64 = 60_000;
const MILLIS_PER_SECOND: f64 = 1_000.0;


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Elapsed time split into whole minutes and rounded seconds, displayed as
/// `m:ss`.
///
/// Seconds are rounded to the nearest integer without carrying into the
/// minutes, so anything from 59.5s up to the full minute reads `0:60`.
pub struct ElapsedTime {
  minutes: i64,
  seconds: i64,
}

impl ElapsedTime {
  /// Negative durations are clamped to zero.
  pub fn from_millis(millis: i64) -> Self {
    let millis = millis.max(0);

    let minutes = millis / MILLIS_PER_MINUTE;
    let seconds =
      ((millis % MILLIS_PER_MINUTE) as f64 / MILLIS_PER_SECOND).round() as i64;

    Self { minutes, seconds }
  }

  /// Time passed between `created_at` and `now`.
  pub fn between(created_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
    Self::from_millis((now - created_at).num_milliseconds())
  }

  pub fn minutes(&self) -> i64 {
    self.minutes
  }

  pub fn seconds(&self) -> i64 {
    self.seconds
  }

  /// Total seconds as displayed, i.e. `0:60` counts as 60.
  pub fn total_seconds(&self) -> i64 {
    self.minutes * 60 + self.seconds
  }
}

impl fmt::Display for ElapsedTime {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}:{:02}", self.minutes, self.seconds)
  }
}

// fin --------------------------------------------------------------------- //
