use std::sync::Arc;

use crm_functions::domain::types::GeoVerdict;
use crm_functions::usecase::geo::GeoCheckUseCase;

use crate::helpers::MockGeo;

fn blocked() -> Arc<[String]> {
    vec!["IR".to_owned(), "KP".to_owned()].into()
}

#[tokio::test]
async fn should_block_listed_country() {
    let uc = GeoCheckUseCase {
        geo: MockGeo::country("IR"),
        blocked: blocked(),
    };
    assert_eq!(
        uc.execute(Some("5.160.0.1")).await,
        GeoVerdict {
            allowed: false,
            country: Some("IR".into())
        }
    );
}

#[tokio::test]
async fn should_allow_other_countries() {
    let uc = GeoCheckUseCase {
        geo: MockGeo::country("DE"),
        blocked: blocked(),
    };
    let verdict = uc.execute(Some("192.0.2.4")).await;
    assert!(verdict.allowed);
    assert_eq!(verdict.country.as_deref(), Some("DE"));
}

#[tokio::test]
async fn should_fail_open_when_lookup_fails() {
    let uc = GeoCheckUseCase {
        geo: MockGeo::failing(),
        blocked: blocked(),
    };
    assert_eq!(
        uc.execute(Some("192.0.2.4")).await,
        GeoVerdict {
            allowed: true,
            country: None
        }
    );
}

#[tokio::test]
async fn should_allow_without_lookup_when_ip_unknown() {
    let geo = MockGeo::country("KP");
    let uc = GeoCheckUseCase {
        geo: geo.clone(),
        blocked: blocked(),
    };
    assert!(uc.execute(None).await.allowed);
    assert!(geo.lookups.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_allow_without_lookup_when_ip_does_not_parse() {
    let geo = MockGeo::country("KP");
    let uc = GeoCheckUseCase {
        geo: geo.clone(),
        blocked: blocked(),
    };
    for raw in ["1.1.1.1/../x?y", "not-an-ip", "5.160.0.1:8080"] {
        assert_eq!(
            uc.execute(Some(raw)).await,
            GeoVerdict {
                allowed: true,
                country: None
            },
            "{raw}"
        );
    }
    assert!(geo.lookups.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_look_up_parsed_address() {
    let geo = MockGeo::country("DE");
    let uc = GeoCheckUseCase {
        geo: geo.clone(),
        blocked: blocked(),
    };
    uc.execute(Some("2001:db8::1")).await;
    assert_eq!(
        *geo.lookups.lock().unwrap(),
        vec!["2001:db8::1".parse::<std::net::IpAddr>().unwrap()]
    );
}
