use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{
    ConfigError, ConfigOverrides, DescriptiveInfoOptions, SearchOptions, SessionConfig,
};
use crate::criterion::CriterionParams;
use crate::normalize::CanonicalRecord;
use crate::request::{RequestError, RequestSpec};
use crate::requests::{
    AvailabilityRequest, CancelReservationRequest, DescriptiveInfoRequest,
    ReadReservationRequest, ReservationRequest, SearchRequest,
};
use crate::response::{ProcessingError, ResponseProcessor, ERROR_ROOT};
use crate::transport::{
    encode_form_value, ReqwestTransport, Transport, TransportError, OTA_REQUEST_FIELD,
};
use crate::tree::parse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    Request(#[from] RequestError),

    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("Response error: {0}")]
    Processing(#[from] ProcessingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ApiError {
    // Only transport failures may succeed when sent again unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}

/// Asynchronous client for the OTA hotel API.
///
/// Every call builds a request document against the session config (merged
/// with call-level overrides), posts it through the transport and runs the
/// response through the [`ResponseProcessor`]. The client holds no mutable
/// state and can be cloned into as many tasks as needed.
#[derive(Clone)]
pub struct OtaClient {
    endpoint: String,
    config: SessionConfig,
    transport: Arc<dyn Transport>,
    processor: ResponseProcessor,
}

impl OtaClient {
    pub fn new(endpoint: impl Into<String>, config: SessionConfig) -> Self {
        Self::with_transport(endpoint, config, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(
        endpoint: impl Into<String>,
        config: SessionConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            config,
            transport,
            processor: ResponseProcessor::new(),
        }
    }

    pub fn from_json_config(endpoint: impl Into<String>, json_str: &str) -> Result<Self, ApiError> {
        let config = SessionConfig::from_json(json_str)?;
        Ok(Self::new(endpoint, config))
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn send(
        &self,
        request: &RequestSpec,
        overrides: &ConfigOverrides,
    ) -> Result<CanonicalRecord, ApiError> {
        let config = self.config.merged(overrides);
        let method = request.method_name();

        let xml = request.build(&config)?;
        debug!(
            method,
            target = config.target.as_str(),
            bytes = xml.len(),
            "Built request"
        );

        let value = encode_form_value(&xml);
        let response = self
            .transport
            .post_form(&self.endpoint, OTA_REQUEST_FIELD, &value)
            .await?;

        let document = parse(&response)?;
        let expected = request.response_root();
        if document.root_name != expected && document.root_name != ERROR_ROOT {
            warn!(
                method,
                expected = %expected,
                root = %document.root_name,
                "Unexpected response root"
            );
        }

        Ok(self.processor.process_document(&document)?)
    }

    pub async fn search_hotels(
        &self,
        criteria: CriterionParams,
        options: SearchOptions,
    ) -> Result<CanonicalRecord, ApiError> {
        let request = SearchRequest::new(criteria).with_options(options);
        self.send(&RequestSpec::Search(request), &ConfigOverrides::default())
            .await
    }

    pub async fn hotel_availability(
        &self,
        criteria: CriterionParams,
    ) -> Result<CanonicalRecord, ApiError> {
        let request = AvailabilityRequest::new(criteria);
        self.send(&RequestSpec::Availability(request), &ConfigOverrides::default())
            .await
    }

    // Returns the content of the first described hotel when the response has one
    pub async fn hotel_descriptive_info(
        &self,
        hotel_codes: Vec<String>,
        options: DescriptiveInfoOptions,
    ) -> Result<CanonicalRecord, ApiError> {
        let request = DescriptiveInfoRequest::new(hotel_codes).with_options(options);
        let record = self
            .send(
                &RequestSpec::DescriptiveInfo(request),
                &ConfigOverrides::default(),
            )
            .await?;

        Ok(record
            .path(&["HotelDescriptiveContents", "HotelDescriptiveContent"])
            .cloned()
            .unwrap_or(record))
    }

    pub async fn do_reservation(
        &self,
        request: ReservationRequest,
    ) -> Result<CanonicalRecord, ApiError> {
        self.send(&RequestSpec::Reservation(request), &ConfigOverrides::default())
            .await
    }

    pub async fn read_reservation(
        &self,
        unique_id: impl Into<String>,
    ) -> Result<CanonicalRecord, ApiError> {
        let request = ReadReservationRequest::new(unique_id);
        self.send(
            &RequestSpec::ReadReservation(request),
            &ConfigOverrides::default(),
        )
        .await
    }

    pub async fn cancel_reservation(
        &self,
        request: CancelReservationRequest,
    ) -> Result<CanonicalRecord, ApiError> {
        self.send(
            &RequestSpec::CancelReservation(request),
            &ConfigOverrides::default(),
        )
        .await
    }
}
