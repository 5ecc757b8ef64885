// Client for OTA (OpenTravel Alliance) XML hotel APIs

pub mod client;
pub mod config;
pub mod criterion;
pub mod normalize;
pub mod request;
pub mod requests;
pub mod response;
pub mod transport;
pub mod tree;

// Re-export key types for convenience
pub use client::{ApiError, OtaClient};
pub use config::{
    ConfigError, ConfigOverrides, DescriptiveInfoOptions, SearchOptions, SessionConfig, Target,
};
pub use criterion::{Address, CriterionParams, OrderBy, RoomStayCandidate, StayDateRange};
pub use normalize::{CanonicalRecord, Normalizer, TreeNormalizer};
pub use request::{OtaRequest, RequestError, RequestSpec};
pub use requests::{
    AvailabilityRequest, CancelReservationRequest, CancelType, ConfirmToken, Customer,
    DescriptiveInfoRequest, Gender, PaymentCard, ReadReservationRequest, ReservationRequest,
    SearchRequest,
};
pub use response::{ErrorRecord, ProcessingError, ResponseProcessor};
pub use transport::{ReqwestTransport, Transport, TransportError};
pub use tree::{GenericNode, ParsedDocument};
