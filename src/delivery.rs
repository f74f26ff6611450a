// Copyright 2022 Florian Eich <florian.eich@gmail.com>
//
// This work is licensed under the Apache License, Version 2.0. You should have
// received a copy of this license along with the source code. If that is not
// the case, please find one at http://www.apache.org/licenses/LICENSE-2.0.

//! Delivery records as served by the delivery endpoint, and the decoding of
//! a response page into them.

use crate::{feed::FetchError, geo::Coordinate};

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use itertools::Itertools;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;


/// Forms of `created_at` with an offset that RFC 3339 does not cover, such as
/// `+0200` or a time without seconds.
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];

/// Offset-less forms accepted for `created_at`, read as UTC.
const NAIVE_FORMATS: [&str; 4] = ["%Y-%m-%dT%H:%M:%S%.f",
                                  "%Y-%m-%dT%H:%M",
                                  "%Y-%m-%d %H:%M:%S%.f",
                                  "%Y-%m-%d %H:%M"];


#[derive(Debug, Error)]
/// Reasons a single record of a page is rejected.
pub enum RecordError {
  #[error("record does not have the expected shape: {0}")]
  Shape(#[from] serde_json::Error),
  #[error("coordinate value {0:?} is not a number")]
  Coordinate(String),
  #[error("location has {0} values, expected latitude and longitude")]
  Location(usize),
  #[error("unable to parse timestamp {0:?}")]
  Timestamp(String),
}


#[derive(Clone, Debug, PartialEq)]
pub struct Merchant {
  pub name:     String,
  pub location: Coordinate,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Customer {
  pub id:       String,
  pub name:     String,
  pub location: Coordinate,
}


#[derive(Clone, Debug, PartialEq)]
/// One delivery, immutable once decoded. `customer.id` is its list key.
pub struct DeliveryRecord {
  created_at:     DateTime<Utc>,
  created_at_raw: String,
  merchant:       Merchant,
  customer:       Customer,
}

impl DeliveryRecord {
  pub fn new(created_at_raw: &str,
             merchant: Merchant,
             customer: Customer)
             -> Result<Self, RecordError> {
    Ok(Self { created_at: parse_timestamp(created_at_raw)?,
              created_at_raw: created_at_raw.to_owned(),
              merchant,
              customer })
  }

  /// Decodes a single element of a response page's `data` array.
  pub fn from_value(value: serde_json::Value) -> Result<Self, RecordError> {
    let wire: WireRecord = serde_json::from_value(value)?;

    let merchant = Merchant { name:     wire.merchant.name,
                              location: wire.merchant.location.coordinate()?, };
    let customer = Customer { id:       wire.customer.id,
                              name:     wire.customer.name,
                              location: wire.customer.location.coordinate()?, };

    Self::new(&wire.created_at, merchant, customer)
  }

  pub fn created_at(&self) -> DateTime<Utc> {
    self.created_at
  }

  /// `created_at` exactly as it was received.
  pub fn created_at_raw(&self) -> &str {
    &self.created_at_raw
  }

  pub fn merchant(&self) -> &Merchant {
    &self.merchant
  }

  pub fn customer(&self) -> &Customer {
    &self.customer
  }
}


/// Decodes a response body of the shape `{ "data": [record, ...] }`.
///
/// A body that does not have this shape is a [`FetchError::Decode`]. Records
/// which fail to decode are skipped with a warning, the others are returned in
/// the order they were received.
pub fn decode_page(body: &[u8]) -> Result<Vec<DeliveryRecord>, FetchError> {
  let page: WirePage = serde_json::from_slice(body)?;

  let records = page.data
                    .into_iter()
                    .enumerate()
                    .filter_map(|(index, value)| {
                      match DeliveryRecord::from_value(value) {
                        Ok(record) => Some(record),
                        Err(err) => {
                          warn!("dropping delivery record #{}: {}", index, err);
                          None
                        }
                      }
                    })
                    .collect();

  Ok(records)
}

/// Orders a snapshot newest to oldest by creation time. Records created at
/// the same instant keep their relative order.
pub fn newest_first(records: Vec<DeliveryRecord>) -> Vec<DeliveryRecord> {
  records.into_iter()
         .sorted_by(|a, b| b.created_at.cmp(&a.created_at))
         .collect()
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RecordError> {
  DateTime::parse_from_rfc3339(raw)
    .or_else(|_| DateTime::parse_from_rfc2822(raw))
    .ok()
    .or_else(|| {
      OFFSET_FORMATS.iter()
                    .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    })
    .map(|timestamp| timestamp.with_timezone(&Utc))
    .or_else(|| parse_naive(raw.strip_suffix('Z').unwrap_or(raw)))
    .ok_or_else(|| RecordError::Timestamp(raw.to_owned()))
}

/// A bare date is midnight UTC.
fn parse_naive(raw: &str) -> Option<DateTime<Utc>> {
  NAIVE_FORMATS.iter()
               .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
               .or_else(|| {
                 let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
                 date.and_hms_opt(0, 0, 0)
               })
               .map(|naive| Utc.from_utc_datetime(&naive))
}


#[derive(Debug, Deserialize)]
struct WirePage {
  data: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct WireRecord {
  created_at: String,
  merchant:   WireMerchant,
  customer:   WireCustomer,
}

#[derive(Debug, Deserialize)]
struct WireMerchant {
  name:     String,
  location: WireLocation,
}

#[derive(Debug, Deserialize)]
struct WireCustomer {
  id:       String,
  name:     String,
  location: WireLocation,
}

#[derive(Debug, Deserialize)]
/// `[latitude, longitude, ...]`, trailing values such as an altitude are
/// ignored.
struct WireLocation(Vec<serde_json::Value>);

impl WireLocation {
  fn coordinate(self) -> Result<Coordinate, RecordError> {
    let len = self.0.len();
    let mut values = self.0.into_iter();

    match (values.next(), values.next()) {
      (Some(lat), Some(lon)) => {
        let lat: Degrees = serde_json::from_value(lat)?;
        let lon: Degrees = serde_json::from_value(lon)?;
        Ok(Coordinate::new(lat.value()?, lon.value()?))
      }
      _ => Err(RecordError::Location(len)),
    }
  }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
/// Some producers send coordinates as numeric strings.
enum Degrees {
  Number(f64),
  Text(String),
}

impl Degrees {
  fn value(self) -> Result<f64, RecordError> {
    match self {
      Degrees::Number(value) => Ok(value),
      Degrees::Text(text) => {
        text.trim().parse().map_err(|_| RecordError::Coordinate(text))
      }
    }
  }
}

// fin --------------------------------------------------------------------- //

#[cfg(test)]
mod tests {
  use super::{decode_page, newest_first, DeliveryRecord, RecordError};
  use crate::{feed::FetchError, geo::Coordinate};

  use chrono::{TimeZone, Utc};
  use pretty_assertions::assert_eq;
  use serde_json::json;


  fn record_json(id: &str, created_at: &str) -> serde_json::Value {
    json!({
      "created_at": created_at,
      "merchant": { "name": "Burger Barn", "location": [52.52, 13.40] },
      "customer": { "id": id, "name": "Neo", "location": [52.50, 13.45] }
    })
  }

  #[test]
  fn from_value_test() {
    let record =
      DeliveryRecord::from_value(record_json("c-1", "2021-06-01T12:00:00Z"))
        .unwrap();

    assert_eq!(record.created_at(),
               Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap());
    assert_eq!(record.created_at_raw(), "2021-06-01T12:00:00Z");
    assert_eq!(record.merchant().name, "Burger Barn");
    assert_eq!(record.merchant().location, Coordinate::new(52.52, 13.40));
    assert_eq!(record.customer().id, "c-1");
    assert_eq!(record.customer().name, "Neo");
    assert_eq!(record.customer().location, Coordinate::new(52.50, 13.45));
  }

  #[test]
  fn timestamp_forms_test() {
    let expected = Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap();

    for raw in ["2021-06-01T12:00:00Z",
                "2021-06-01T14:00:00+02:00",
                "2021-06-01T14:00:00+0200",
                "2021-06-01T14:00+02:00",
                "2021-06-01T12:00:00.000Z",
                "2021-06-01T12:00Z",
                "2021-06-01T12:00:00",
                "2021-06-01T12:00",
                "2021-06-01 12:00:00",
                "2021-06-01 12:00",
                "Tue, 1 Jun 2021 12:00:00 +0000",
                "Tue, 1 Jun 2021 14:00:00 +0200"]
    {
      let record = DeliveryRecord::from_value(record_json("c-1", raw)).unwrap();
      assert_eq!(record.created_at(), expected, "parsing {}", raw);
    }

    let record =
      DeliveryRecord::from_value(record_json("c-1", "2021-06-01")).unwrap();
    assert_eq!(record.created_at(),
               Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap());

    let err = DeliveryRecord::from_value(record_json("c-1", "yesterday"));
    assert!(matches!(err, Err(RecordError::Timestamp(raw)) if raw == "yesterday"));
  }

  #[test]
  fn string_coordinates_test() {
    let value = json!({
      "created_at": "2021-06-01T12:00:00Z",
      "merchant": { "name": "Burger Barn", "location": ["52.52", " 13.40 "] },
      "customer": { "id": "c-1", "name": "Neo", "location": [0, "0.1"] }
    });

    let record = DeliveryRecord::from_value(value).unwrap();
    assert_eq!(record.merchant().location, Coordinate::new(52.52, 13.40));
    assert_eq!(record.customer().location, Coordinate::new(0.0, 0.1));

    let value = json!({
      "created_at": "2021-06-01T12:00:00Z",
      "merchant": { "name": "Burger Barn", "location": ["north", 13.40] },
      "customer": { "id": "c-1", "name": "Neo", "location": [0, 0] }
    });

    assert!(matches!(DeliveryRecord::from_value(value),
                     Err(RecordError::Coordinate(text)) if text == "north"));
  }

  #[test]
  fn malformed_record_test() {
    let missing_location = json!({
      "created_at": "2021-06-01T12:00:00Z",
      "merchant": { "name": "Burger Barn" },
      "customer": { "id": "c-1", "name": "Neo", "location": [0, 0] }
    });
    let short_location = json!({
      "created_at": "2021-06-01T12:00:00Z",
      "merchant": { "name": "Burger Barn", "location": [0] },
      "customer": { "id": "c-1", "name": "Neo", "location": [0, 0] }
    });

    assert!(matches!(DeliveryRecord::from_value(missing_location),
                     Err(RecordError::Shape(_))));
    assert!(matches!(DeliveryRecord::from_value(short_location),
                     Err(RecordError::Location(1))));
  }

  #[test]
  fn trailing_location_values_test() {
    let value = json!({
      "created_at": "2021-06-01T12:00:00Z",
      "merchant": { "name": "Burger Barn", "location": [52.52, 13.40, 34.0] },
      "customer": { "id": "c-1", "name": "Neo", "location": [0, "0.1", null] }
    });

    let record = DeliveryRecord::from_value(value).unwrap();
    assert_eq!(record.merchant().location, Coordinate::new(52.52, 13.40));
    assert_eq!(record.customer().location, Coordinate::new(0.0, 0.1));
  }

  #[test]
  fn decode_page_test() {
    let body = json!({
      "data": [
        record_json("c-1", "2021-06-01T12:00:00Z"),
        { "created_at": "2021-06-01T12:00:00Z" },
        record_json("c-3", "2021-06-01T12:05:00Z"),
      ]
    });

    let records = decode_page(body.to_string().as_bytes()).unwrap();
    let ids = records.iter()
                     .map(|r| r.customer().id.as_str())
                     .collect::<Vec<_>>();

    assert_eq!(ids, vec!["c-1", "c-3"]);
  }

  #[test]
  fn decode_page_shape_test() {
    assert!(matches!(decode_page(b"[]"), Err(FetchError::Decode(_))));
    assert!(matches!(decode_page(b"{\"records\": []}"),
                     Err(FetchError::Decode(_))));
    assert!(matches!(decode_page(b"<html></html>"),
                     Err(FetchError::Decode(_))));
    assert!(decode_page(b"{\"data\": []}").unwrap().is_empty());
  }

  #[test]
  fn newest_first_test() {
    let records = ["2021-06-01T12:00:00Z",
                   "2021-06-01T12:10:00Z",
                   "2021-06-01T12:05:00Z",
                   "2021-06-01T12:10:00Z"].iter()
                                          .enumerate()
                                          .map(|(i, ts)| {
                                            let id = format!("c-{}", i);
                                            let value = record_json(&id, ts);
                                            DeliveryRecord::from_value(value)
                                              .unwrap()
                                          })
                                          .collect::<Vec<_>>();

    let ids = newest_first(records).into_iter()
                                   .map(|r| r.customer().id.clone())
                                   .collect::<Vec<_>>();

    assert_eq!(ids, vec!["c-1", "c-3", "c-2", "c-0"]);
  }
}
