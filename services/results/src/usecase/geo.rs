use std::net::IpAddr;

use crate::domain::repository::{GeoLookup, ResultRepository};
use crate::domain::types::TargetResult;
use crate::error::ResultsServiceError;

/// Resolves a recipient's IP to coordinates and stores them on the result.
///
/// `GeoRecordNotFound` means "leave coordinates unset"; callers on the
/// tracking path should not abort on it.
pub struct UpdateGeoUseCase<R, G>
where
    R: ResultRepository,
    G: GeoLookup,
{
    pub results: R,
    pub geo: G,
}

impl<R, G> UpdateGeoUseCase<R, G>
where
    R: ResultRepository,
    G: GeoLookup,
{
    pub async fn execute(
        &self,
        result: &mut TargetResult,
        addr: &str,
    ) -> Result<(), ResultsServiceError> {
        let ip: IpAddr = addr
            .parse()
            .map_err(|_| ResultsServiceError::InvalidAddress)?;
        let point = self
            .geo
            .lookup(ip)?
            .ok_or(ResultsServiceError::GeoRecordNotFound)?;

        self.results.update_geo(result.id, addr, point).await?;
        result.ip = Some(addr.to_owned());
        result.latitude = Some(point.latitude);
        result.longitude = Some(point.longitude);
        Ok(())
    }
}
