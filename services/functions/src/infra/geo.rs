use std::net::IpAddr;

use reqwest::Client;
use serde::Deserialize;

use crate::domain::repository::GeoLookup;
use crate::error::FunctionsError;

/// `GET {base_url}/{ip}` against an ip-api style JSON endpoint.
#[derive(Clone)]
pub struct HttpGeoLookup {
    pub client: Client,
    pub base_url: String,
}

#[derive(Deserialize)]
struct GeoResponse {
    #[serde(rename = "countryCode", alias = "country_code")]
    country_code: Option<String>,
}

impl GeoLookup for HttpGeoLookup {
    async fn country(&self, ip: IpAddr) -> Result<String, FunctionsError> {
        let response = self
            .client
            .get(format!("{}/{ip}", self.base_url.trim_end_matches('/')))
            .send()
            .await
            .map_err(|e| FunctionsError::Upstream(format!("geo lookup unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FunctionsError::Upstream(format!(
                "geo lookup returned {status}"
            )));
        }

        let body: GeoResponse = response
            .json()
            .await
            .map_err(|e| FunctionsError::Upstream(format!("malformed geo response: {e}")))?;
        body.country_code
            .filter(|c| !c.is_empty())
            .map(|c| c.to_ascii_uppercase())
            .ok_or_else(|| FunctionsError::Upstream("geo lookup returned no country".into()))
    }
}
