use serde::Serialize;

use crate::config::SessionConfig;
use crate::request::{require, to_xml, OtaRequest, RequestError, RESERVATION_CONFIRMATION_TYPE};

const METHOD: &str = "OTA_ReadRQ";

// Retrieve an existing reservation by its confirmation number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadReservationRequest {
    pub unique_id: String,
}

impl ReadReservationRequest {
    pub fn new(unique_id: impl Into<String>) -> Self {
        Self {
            unique_id: unique_id.into(),
        }
    }
}

impl OtaRequest for ReadReservationRequest {
    fn method_name(&self) -> &'static str {
        METHOD
    }

    fn version(&self) -> &'static str {
        "1.006"
    }

    fn validate(&self) -> Result<(), RequestError> {
        require(METHOD, "UniqueID", &self.unique_id)
    }

    fn body(&self, _config: &SessionConfig) -> Result<String, RequestError> {
        to_xml(&XmlReadRequests {
            read_request: XmlReadRequest {
                unique_id: XmlUniqueId {
                    id: &self.unique_id,
                    id_type: RESERVATION_CONFIRMATION_TYPE,
                },
            },
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename = "ReadRequests", rename_all = "PascalCase")]
struct XmlReadRequests<'a> {
    read_request: XmlReadRequest<'a>,
}

#[derive(Debug, Serialize)]
struct XmlReadRequest<'a> {
    #[serde(rename = "UniqueID")]
    unique_id: XmlUniqueId<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename = "UniqueID")]
pub(crate) struct XmlUniqueId<'a> {
    #[serde(rename = "@ID")]
    pub(crate) id: &'a str,
    #[serde(rename = "@Type")]
    pub(crate) id_type: &'static str,
}
