use std::net::IpAddr;
use std::sync::Arc;

use crate::domain::repository::GeoLookup;
use crate::domain::types::GeoVerdict;

/// Country-level access check. Only a successful lookup of a blocked
/// country denies; anything else lets the caller through.
pub struct GeoCheckUseCase<G: GeoLookup> {
    pub geo: G,
    pub blocked: Arc<[String]>,
}

impl<G: GeoLookup> GeoCheckUseCase<G> {
    pub async fn execute(&self, ip: Option<&str>) -> GeoVerdict {
        let unknown = GeoVerdict {
            allowed: true,
            country: None,
        };
        let Some(raw) = ip else {
            return unknown;
        };
        let Ok(ip) = raw.parse::<IpAddr>() else {
            tracing::warn!(ip = %raw, "unparseable client ip; allowing");
            return unknown;
        };
        match self.geo.country(ip).await {
            Ok(country) => {
                let allowed = !self.blocked.iter().any(|c| c.eq_ignore_ascii_case(&country));
                if !allowed {
                    tracing::info!(%ip, %country, "request from blocked country");
                }
                GeoVerdict {
                    allowed,
                    country: Some(country),
                }
            }
            Err(e) => {
                tracing::warn!(%ip, error = %e, "geo lookup failed; allowing");
                unknown
            }
        }
    }
}
