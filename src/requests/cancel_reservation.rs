use serde::Serialize;

use super::read_reservation::XmlUniqueId;
use crate::config::SessionConfig;
use crate::request::{require, to_xml, OtaRequest, RequestError, RESERVATION_CONFIRMATION_TYPE};

const METHOD: &str = "OTA_CancelRQ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CancelType {
    Initiate,
    Ignore,
    Commit,
    #[default]
    Cancel,
}

impl CancelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CancelType::Initiate => "Initiate",
            CancelType::Ignore => "Ignore",
            CancelType::Commit => "Commit",
            CancelType::Cancel => "Cancel",
        }
    }
}

/// Cancels a reservation identified by its confirmation number.
///
/// The cancel code is the verification secret returned when the reservation
/// was made. Without an explicit type the request is a plain `Cancel`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelReservationRequest {
    pub unique_id: String,
    pub cancel_code: String,
    pub cancel_type: Option<CancelType>,
}

impl CancelReservationRequest {
    pub fn new(unique_id: impl Into<String>, cancel_code: impl Into<String>) -> Self {
        Self {
            unique_id: unique_id.into(),
            cancel_code: cancel_code.into(),
            cancel_type: None,
        }
    }

    pub fn with_cancel_type(mut self, cancel_type: CancelType) -> Self {
        self.cancel_type = Some(cancel_type);
        self
    }
}

impl OtaRequest for CancelReservationRequest {
    fn method_name(&self) -> &'static str {
        METHOD
    }

    fn version(&self) -> &'static str {
        "1.001"
    }

    fn validate(&self) -> Result<(), RequestError> {
        require(METHOD, "UniqueID", &self.unique_id)?;
        require(METHOD, "CancelCode", &self.cancel_code)
    }

    fn root_attributes(&self, _config: &SessionConfig) -> Vec<(&'static str, String)> {
        let cancel_type = self.cancel_type.unwrap_or_default();
        vec![("CancelType", cancel_type.as_str().to_string())]
    }

    fn body(&self, _config: &SessionConfig) -> Result<String, RequestError> {
        // two sibling elements, serialized one after the other
        let unique_id = to_xml(&XmlUniqueId {
            id: &self.unique_id,
            id_type: RESERVATION_CONFIRMATION_TYPE,
        })?;
        let verification = to_xml(&XmlVerification {
            tpa_extensions: XmlCancelExtension {
                cancel_code: XmlCancelCode {
                    code: &self.cancel_code,
                },
            },
        })?;
        Ok(unique_id + &verification)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename = "Verification")]
struct XmlVerification<'a> {
    #[serde(rename = "TPA_Extensions")]
    tpa_extensions: XmlCancelExtension<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlCancelExtension<'a> {
    cancel_code: XmlCancelCode<'a>,
}

#[derive(Debug, Serialize)]
struct XmlCancelCode<'a> {
    #[serde(rename = "@Code")]
    code: &'a str,
}
