/// Results service error variants.
#[derive(Debug, thiserror::Error)]
pub enum ResultsServiceError {
    #[error("campaign not found")]
    CampaignNotFound,
    #[error("result not found")]
    ResultNotFound,
    #[error("geo record not found")]
    GeoRecordNotFound,
    #[error("invalid ip address")]
    InvalidAddress,
    #[error("invalid event details")]
    InvalidDetails,
    #[error("geo lookup unavailable: {0}")]
    LookupUnavailable(String),
    #[error("duplicate result identifier")]
    DuplicateIdentifier,
    #[error("identifier generation exhausted")]
    GenerationExhausted,
    #[error("concurrent update conflict")]
    ConcurrentUpdate,
    #[error("persistence error")]
    Persistence(#[from] anyhow::Error),
}

impl ResultsServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CampaignNotFound => "CAMPAIGN_NOT_FOUND",
            Self::ResultNotFound => "RESULT_NOT_FOUND",
            Self::GeoRecordNotFound => "GEO_RECORD_NOT_FOUND",
            Self::InvalidAddress => "INVALID_ADDRESS",
            Self::InvalidDetails => "INVALID_DETAILS",
            Self::LookupUnavailable(_) => "LOOKUP_UNAVAILABLE",
            Self::DuplicateIdentifier => "DUPLICATE_IDENTIFIER",
            Self::GenerationExhausted => "GENERATION_EXHAUSTED",
            Self::ConcurrentUpdate => "CONCURRENT_UPDATE",
            Self::Persistence(_) => "PERSISTENCE",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CampaignNotFound | Self::ResultNotFound | Self::GeoRecordNotFound
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidAddress | Self::InvalidDetails)
    }
}
