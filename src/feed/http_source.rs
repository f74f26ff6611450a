// Copyright 2022 Florian Eich <florian.eich@gmail.com>
//
// This work is licensed under the Apache License, Version 2.0. You should have
// received a copy of this license along with the source code. If that is not
// the case, please find one at http://www.apache.org/licenses/LICENSE-2.0.

use super::{DeliverySource, FetchError};
use crate::delivery::{self, DeliveryRecord};

use async_trait::async_trait;
use eyre::Result;
use reqwest::{header::CONTENT_TYPE, Client, Url};
use tracing::debug;


#[derive(Clone, Debug)]
/// Fetches the delivery list with a plain `GET` from a fixed endpoint.
pub struct HttpSource {
  client:   Client,
  endpoint: Url,
}

impl HttpSource {
  /// Fails if `endpoint` is not a valid absolute URL.
  pub fn new(endpoint: &str) -> Result<Self> {
    let endpoint = Url::parse(endpoint)?;

    Ok(Self { client: Client::new(),
              endpoint })
  }

  pub fn endpoint(&self) -> &Url {
    &self.endpoint
  }
}

#[async_trait]
impl DeliverySource for HttpSource {
  async fn fetch(&self) -> Result<Vec<DeliveryRecord>, FetchError> {
    let response = self.client
                       .get(self.endpoint.clone())
                       .header(CONTENT_TYPE, "application/json")
                       .send()
                       .await?;

    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::Status(status));
    }

    let body = response.bytes().await?;
    debug!("received {} bytes from {}", body.len(), self.endpoint);

    delivery::decode_page(&body)
  }
}

// fin --------------------------------------------------------------------- //
