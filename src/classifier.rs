// Copyright 2022 Florian Eich <florian.eich@gmail.com>
//
// This work is licensed under the Apache License, Version 2.0. You should have
// received a copy of this license along with the source code. If that is not
// the case, please find one at http://www.apache.org/licenses/LICENSE-2.0.

//! Red zone classification of deliveries: a delivery is red zoned when it is
//! both slow and far.

use crate::{delivery::DeliveryRecord, elapsed::ElapsedTime, geo::Distance};

use chrono::{DateTime, Utc};
use serde::Deserialize;


#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
/// Holds the `[thresholds]` section of the config file.
pub struct Thresholds {
  /// A delivery is slow once its displayed elapsed time exceeds this.
  pub slow_after_secs: i64,
  /// A delivery is far once its displayed distance exceeds this.
  pub far_beyond_km:   u32,
}

impl Default for Thresholds {
  fn default() -> Self {
    Self { slow_after_secs: 30,
           far_beyond_km:   5, }
  }
}


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
  Red,
  Green,
}

impl Zone {
  pub fn is_red(&self) -> bool {
    matches!(self, Zone::Red)
  }
}

impl From<bool> for Zone {
  fn from(red_zoned: bool) -> Self {
    if red_zoned {
      Zone::Red
    } else {
      Zone::Green
    }
  }
}


#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Stateless predicate over a [`DeliveryRecord`] and a wall-clock instant.
pub struct DeliveryClassifier {
  thresholds: Thresholds,
}

impl DeliveryClassifier {
  pub fn new(thresholds: Thresholds) -> Self {
    Self { thresholds }
  }

  pub fn thresholds(&self) -> &Thresholds {
    &self.thresholds
  }

  /// Judged on the elapsed time as it is displayed, so `0:31` is slow even
  /// though only 30.5 seconds may have passed.
  pub fn is_slow(&self, record: &DeliveryRecord, now: DateTime<Utc>) -> bool {
    let elapsed = ElapsedTime::between(record.created_at(), now);
    elapsed.total_seconds() > self.thresholds.slow_after_secs
  }

  /// Judged on the displayed distance, i.e. whole kilometers.
  pub fn is_far(&self, record: &DeliveryRecord) -> bool {
    let distance = Distance::between(record.merchant().location,
                                     record.customer().location);
    distance.km().ceil() > f64::from(self.thresholds.far_beyond_km)
  }

  pub fn is_red_zoned(&self,
                      record: &DeliveryRecord,
                      now: DateTime<Utc>)
                      -> bool {
    self.is_slow(record, now) && self.is_far(record)
  }

  pub fn zone(&self, record: &DeliveryRecord, now: DateTime<Utc>) -> Zone {
    Zone::from(self.is_red_zoned(record, now))
  }
}

// fin --------------------------------------------------------------------- //

#[cfg(test)]
mod tests {
  use super::{DeliveryClassifier, Thresholds, Zone};
  use crate::{delivery::{Customer, DeliveryRecord, Merchant},
              elapsed::ElapsedTime,
              geo::{Coordinate, Distance}};

  use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
  use pretty_assertions::assert_eq;


  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap()
  }

  /// Record created `age` before [`now`], merchant at the origin and the
  /// customer `lon` degrees east of it along the equator.
  fn record(age: Duration, lon: f64) -> DeliveryRecord {
    let created_at =
      (now() - age).to_rfc3339_opts(SecondsFormat::Millis, true);
    let merchant = Merchant { name:     "Burger Barn".into(),
                              location: Coordinate::new(0.0, 0.0), };
    let customer = Customer { id:       "c-1".into(),
                              name:     "Neo".into(),
                              location: Coordinate::new(0.0, lon), };

    DeliveryRecord::new(&created_at, merchant, customer).unwrap()
  }

  #[test]
  fn thresholds_test() {
    let thresholds: Thresholds = toml::from_str("far_beyond_km = 10").unwrap();

    assert_eq!(thresholds,
               Thresholds { slow_after_secs: 30,
                            far_beyond_km:   10, });
    assert_eq!(Thresholds::default(),
               Thresholds { slow_after_secs: 30,
                            far_beyond_km:   5, });
  }

  #[test]
  fn near_is_never_red_test() {
    let classifier = DeliveryClassifier::default();

    // 0.05 degrees is about 5.56km, which displays as 5.00
    for minutes in [0, 1, 5, 60, 24 * 60] {
      let record = record(Duration::minutes(minutes), 0.05);
      assert!(!classifier.is_far(&record));
      assert!(!classifier.is_red_zoned(&record, now()));
    }
  }

  #[test]
  fn quick_is_never_red_test() {
    let classifier = DeliveryClassifier::default();

    for lon in [0.1, 1.0, 10.0, 90.0, 180.0] {
      for secs in [0, 10, 30] {
        let record = record(Duration::seconds(secs), lon);
        assert!(classifier.is_far(&record));
        assert!(!classifier.is_slow(&record, now()));
        assert_eq!(classifier.zone(&record, now()), Zone::Green);
      }
    }
  }

  #[test]
  fn slow_and_far_test() {
    let classifier = DeliveryClassifier::default();

    // 0.09 degrees is about 10.01km
    let record = record(Duration::seconds(40), 0.09);

    assert!(classifier.is_slow(&record, now()));
    assert!(classifier.is_far(&record));
    assert!(classifier.is_red_zoned(&record, now()));
    assert_eq!(classifier.zone(&record, now()), Zone::Red);
  }

  #[test]
  fn slow_boundary_test() {
    let classifier = DeliveryClassifier::default();

    let cases = [(30_000, false),
                 (30_499, false),
                 (30_500, true), // displayed as 0:31
                 (59_500, true), // displayed as 0:60
                 (60_000, true),
                 (600_000, true)];

    for (millis, slow) in cases {
      let record = record(Duration::milliseconds(millis), 1.0);
      assert_eq!(classifier.is_slow(&record, now()), slow, "{}ms", millis);
    }
  }

  #[test]
  fn far_boundary_test() {
    let classifier = DeliveryClassifier::default();

    // 0.054 degrees is about 6.0045km, the first whole kilometer above five
    assert!(classifier.is_far(&record(Duration::zero(), 0.054)));
    // 0.0539 degrees is about 5.9934km, which still displays as 5.00
    assert!(!classifier.is_far(&record(Duration::zero(), 0.0539)));
  }

  #[test]
  fn custom_thresholds_test() {
    let thresholds = Thresholds { slow_after_secs: 120,
                                  far_beyond_km:   20, };
    let classifier = DeliveryClassifier::new(thresholds);
    let within = record(Duration::seconds(90), 0.1);
    let beyond = record(Duration::seconds(121), 0.2);

    assert!(!classifier.is_slow(&within, now()));
    assert!(!classifier.is_far(&within));
    assert!(classifier.is_slow(&beyond, now()));
    assert!(classifier.is_far(&beyond));
  }

  #[test]
  fn far_away_recent_scenario_test() {
    let record = record(Duration::seconds(45), 0.1);
    let distance = Distance::between(record.merchant().location,
                                     record.customer().location);
    let elapsed = ElapsedTime::between(record.created_at(), now());

    assert_eq!(distance.to_string(), "11.00");
    assert_eq!(elapsed.to_string(), "0:45");
    assert!(DeliveryClassifier::default().is_red_zoned(&record, now()));
  }

  #[test]
  fn same_place_old_scenario_test() {
    let record = record(Duration::minutes(5), 0.0);
    let distance = Distance::between(record.merchant().location,
                                     record.customer().location);

    assert_eq!(distance.to_string(), "0.00");
    assert!(!DeliveryClassifier::default().is_red_zoned(&record, now()));
  }
}
