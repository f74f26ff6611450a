// Copyright 2022 Florian Eich <florian.eich@gmail.com>
//
// This work is licensed under the Apache License, Version 2.0. You should have
// received a copy of this license along with the source code. If that is not
// the case, please find one at http://www.apache.org/licenses/LICENSE-2.0.

//! Great-circle distances between points given in degrees.

use std::fmt;


/// Mean earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;


#[derive(Clone, Copy, Debug, PartialEq)]
/// A `(latitude, longitude)` pair in degrees. Not range checked.
pub struct Coordinate {
  pub lat: f64,
  pub lon: f64,
}

impl Coordinate {
  pub fn new(lat: f64, lon: f64) -> Self {
    Self { lat, lon }
  }
}


/// Great-circle distance in kilometers using the haversine formula.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
  let d_lat = (to.lat - from.lat).to_radians();
  let d_lon = (to.lon - from.lon).to_radians();

  let a = (d_lat / 2.0).sin().powi(2)
          + from.lat.to_radians().cos()
            * to.lat.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);

  // rounding can push `a` a hair past one for antipodal points, which would
  // turn `sqrt(1 - a)` into NaN
  let a = a.min(1.0);
  let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

  EARTH_RADIUS_KM * c
}


#[derive(Clone, Copy, Debug, PartialEq)]
/// Distance between two [`Coordinate`]s as it is shown to the user.
///
/// The displayed value drops the fractional kilometers before formatting
/// with two decimals, so it always reads `"<integer>.00"`. The exact value is
/// kept around and available through [`exact_km`](Self::exact_km).
pub struct Distance {
  exact_km: f64,
}

impl Distance {
  pub fn between(from: Coordinate, to: Coordinate) -> Self {
    Self { exact_km: haversine_km(from, to) }
  }

  /// Whole kilometers, fractional part discarded (not rounded).
  pub fn km(&self) -> f64 {
    self.exact_km.trunc()
  }

  pub fn exact_km(&self) -> f64 {
    self.exact_km
  }
}

impl fmt::Display for Distance {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:.2}", self.km())
  }
}

// fin --------------------------------------------------------------------- //
