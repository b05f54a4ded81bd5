use tackle_domain::status::ResultStatus;
use tackle_results::domain::repository::GeoLookup;
use tackle_results::domain::types::{GeoPoint, TargetResult};
use tackle_results::error::ResultsServiceError;
use tackle_results::infra::geo::MaxMindGeoLookup;
use tackle_results::usecase::geo::UpdateGeoUseCase;

use crate::helpers::{MockResultRepo, StaticGeoLookup, test_result};

const LONDON: GeoPoint = GeoPoint {
    latitude: 51.5142,
    longitude: -0.0931,
};

fn located_result() -> TargetResult {
    TargetResult {
        ip: Some("198.51.100.1".to_owned()),
        latitude: Some(40.7128),
        longitude: Some(-74.006),
        ..test_result(ResultStatus::Opened)
    }
}

type GeoUseCase = UpdateGeoUseCase<MockResultRepo, StaticGeoLookup>;

fn usecase(geo: StaticGeoLookup, row: TargetResult) -> (GeoUseCase, MockResultRepo) {
    let results = MockResultRepo::with_rows(vec![row]);
    (
        UpdateGeoUseCase {
            results: results.clone(),
            geo,
        },
        results,
    )
}

#[tokio::test]
async fn should_store_coordinates_from_dataset() {
    let geo = StaticGeoLookup::new(vec![("81.2.69.142", LONDON)]);
    let (usecase, results) = usecase(geo, test_result(ResultStatus::Opened));
    let mut result = test_result(ResultStatus::Opened);

    usecase.execute(&mut result, "81.2.69.142").await.unwrap();

    assert_eq!(result.ip.as_deref(), Some("81.2.69.142"));
    assert_eq!(result.latitude, Some(LONDON.latitude));
    assert_eq!(result.longitude, Some(LONDON.longitude));
    assert_eq!(results.stored(result.id), result);
}

#[tokio::test]
async fn should_resolve_ipv6_addresses() {
    let geo = StaticGeoLookup::new(vec![("2001:db8::1", LONDON)]);
    let (usecase, _results) = usecase(geo, test_result(ResultStatus::Clicked));
    let mut result = test_result(ResultStatus::Clicked);

    usecase.execute(&mut result, "2001:db8::1").await.unwrap();

    assert_eq!(result.latitude, Some(LONDON.latitude));
}

#[tokio::test]
async fn should_reject_unparsable_address_and_leave_fields_untouched() {
    let geo = StaticGeoLookup::new(vec![("81.2.69.142", LONDON)]);
    let (usecase, results) = usecase(geo, located_result());
    let mut result = located_result();

    let err = usecase.execute(&mut result, "not-an-ip").await.unwrap_err();

    assert!(matches!(err, ResultsServiceError::InvalidAddress));
    assert!(err.is_validation());
    assert_eq!(result, located_result());
    assert_eq!(results.stored(result.id), located_result());
}

#[tokio::test]
async fn should_return_geo_record_not_found_for_unknown_address() {
    let geo = StaticGeoLookup::new(vec![]);
    let (usecase, results) = usecase(geo, located_result());
    let mut result = located_result();

    let err = usecase.execute(&mut result, "10.0.0.1").await.unwrap_err();

    assert!(matches!(err, ResultsServiceError::GeoRecordNotFound));
    assert_eq!(result, located_result());
    assert_eq!(results.stored(result.id).ip.as_deref(), Some("198.51.100.1"));
}

#[tokio::test]
async fn should_propagate_lookup_unavailable() {
    let (usecase, _results) = usecase(StaticGeoLookup::unavailable(), located_result());
    let mut result = located_result();

    let err = usecase.execute(&mut result, "81.2.69.142").await.unwrap_err();

    assert_eq!(err.kind(), "LOOKUP_UNAVAILABLE");
    assert_eq!(result, located_result());
}

// ── GeoLite2-City reader ─────────────────────────────────────────────────────

const CITY_FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/GeoIP2-City-Test.mmdb");

fn city_dataset() -> MaxMindGeoLookup {
    MaxMindGeoLookup::open(CITY_FIXTURE).unwrap()
}

#[test]
fn should_read_coordinates_from_city_dataset() {
    let point = city_dataset().lookup("81.2.69.142".parse().unwrap()).unwrap();

    assert_eq!(point, Some(LONDON));
}

#[test]
fn should_return_no_point_for_address_outside_dataset() {
    let geo = city_dataset();

    assert_eq!(geo.lookup("10.0.0.1".parse().unwrap()).unwrap(), None);
    assert_eq!(geo.lookup("81.2.69.143".parse().unwrap()).unwrap(), None);
}

#[test]
fn should_return_no_point_for_city_record_without_location() {
    let point = city_dataset().lookup("81.2.69.160".parse().unwrap()).unwrap();

    assert_eq!(point, None);
}

#[tokio::test]
async fn should_enrich_result_from_city_dataset() {
    let results = MockResultRepo::with_rows(vec![test_result(ResultStatus::Clicked)]);
    let usecase = UpdateGeoUseCase {
        results: results.clone(),
        geo: city_dataset(),
    };
    let mut result = test_result(ResultStatus::Clicked);

    usecase.execute(&mut result, "81.2.69.142").await.unwrap();
    let err = usecase.execute(&mut result, "81.2.69.160").await.unwrap_err();

    assert!(matches!(err, ResultsServiceError::GeoRecordNotFound));
    let stored = results.stored(result.id);
    assert_eq!(stored.ip.as_deref(), Some("81.2.69.142"));
    assert_eq!(stored.latitude, Some(LONDON.latitude));
    assert_eq!(stored.longitude, Some(LONDON.longitude));
}
