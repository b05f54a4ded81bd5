use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;

use maxminddb::{MaxMindDBError, Reader, geoip2};

use crate::domain::repository::GeoLookup;
use crate::domain::types::GeoPoint;
use crate::error::ResultsServiceError;

/// GeoLite2-City dataset loaded into memory once per process.
///
/// Clones share the same reader; it is read-only after load, so lookups need
/// no synchronization. The dataset is released when the last clone drops.
#[derive(Clone)]
pub struct MaxMindGeoLookup {
    reader: Arc<Reader<Vec<u8>>>,
}

impl MaxMindGeoLookup {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ResultsServiceError> {
        let path = path.as_ref();
        let reader = Reader::open_readfile(path).map_err(|e| {
            ResultsServiceError::LookupUnavailable(format!("{}: {e}", path.display()))
        })?;
        tracing::info!(
            path = %path.display(),
            database_type = %reader.metadata.database_type,
            "geo dataset loaded"
        );
        Ok(Self {
            reader: Arc::new(reader),
        })
    }
}

impl GeoLookup for MaxMindGeoLookup {
    fn lookup(&self, ip: IpAddr) -> Result<Option<GeoPoint>, ResultsServiceError> {
        match self.reader.lookup::<geoip2::City>(ip) {
            Ok(city) => Ok(city.location.and_then(|loc| {
                Some(GeoPoint {
                    latitude: loc.latitude?,
                    longitude: loc.longitude?,
                })
            })),
            Err(MaxMindDBError::AddressNotFoundError(_)) => Ok(None),
            Err(e) => Err(ResultsServiceError::LookupUnavailable(e.to_string())),
        }
    }
}
