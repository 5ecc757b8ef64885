use serde::Serialize;

use crate::config::{DescriptiveInfoOptions, SessionConfig};
use crate::request::{require, to_xml, OtaRequest, RequestError};

const METHOD: &str = "OTA_HotelDescriptiveInfoRQ";

// Static content (description, facilities, policies...) for one or more hotels
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveInfoRequest {
    pub hotel_codes: Vec<String>,
    pub options: DescriptiveInfoOptions,
}

impl DescriptiveInfoRequest {
    pub fn new<I, S>(hotel_codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hotel_codes: hotel_codes.into_iter().map(Into::into).collect(),
            options: DescriptiveInfoOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DescriptiveInfoOptions) -> Self {
        self.options = options;
        self
    }

    fn make_hotel_info<'a>(&self, hotel_code: &'a str) -> XmlHotelDescriptiveInfo<'a> {
        let options = &self.options;
        let mut content_infos = Vec::new();
        if options.customer_ratings {
            content_infos.push(XmlContentInfo {
                name: "CustomerRatings",
            });
        }
        if options.customer_reviews {
            content_infos.push(XmlContentInfo {
                name: "CustomerReviews",
            });
        }

        XmlHotelDescriptiveInfo {
            hotel_code,
            hotel_info: XmlSendData {
                send_data: options.hotel_info,
            },
            facility_info: XmlFacilityInfo {
                send_guest_rooms: options.facility_info,
            },
            policies: XmlPolicies {
                send_policies: options.policies,
            },
            contact_info: XmlSendData {
                send_data: options.contact_info,
            },
            multimedia_objects: XmlSendData {
                send_data: options.multimedia_objects,
            },
            content_infos: XmlContentInfos { content_infos },
        }
    }
}

impl OtaRequest for DescriptiveInfoRequest {
    fn method_name(&self) -> &'static str {
        METHOD
    }

    fn version(&self) -> &'static str {
        "1.002"
    }

    fn validate(&self) -> Result<(), RequestError> {
        if self.hotel_codes.is_empty() {
            return Err(RequestError::MissingField {
                operation: METHOD,
                field: "HotelCode",
            });
        }
        self.hotel_codes
            .iter()
            .try_for_each(|code| require(METHOD, "HotelCode", code))
    }

    fn body(&self, _config: &SessionConfig) -> Result<String, RequestError> {
        to_xml(&XmlHotelDescriptiveInfos {
            infos: self
                .hotel_codes
                .iter()
                .map(|code| self.make_hotel_info(code))
                .collect(),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename = "HotelDescriptiveInfos")]
struct XmlHotelDescriptiveInfos<'a> {
    #[serde(rename = "HotelDescriptiveInfo")]
    infos: Vec<XmlHotelDescriptiveInfo<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlHotelDescriptiveInfo<'a> {
    #[serde(rename = "@HotelCode")]
    hotel_code: &'a str,
    hotel_info: XmlSendData,
    facility_info: XmlFacilityInfo,
    policies: XmlPolicies,
    contact_info: XmlSendData,
    multimedia_objects: XmlSendData,
    content_infos: XmlContentInfos,
}

#[derive(Debug, Serialize)]
struct XmlSendData {
    #[serde(rename = "@SendData")]
    send_data: bool,
}

#[derive(Debug, Serialize)]
struct XmlFacilityInfo {
    #[serde(rename = "@SendGuestRooms")]
    send_guest_rooms: bool,
}

#[derive(Debug, Serialize)]
struct XmlPolicies {
    #[serde(rename = "@SendPolicies")]
    send_policies: bool,
}

#[derive(Debug, Serialize)]
struct XmlContentInfos {
    #[serde(rename = "ContentInfo")]
    content_infos: Vec<XmlContentInfo>,
}

#[derive(Debug, Serialize)]
struct XmlContentInfo {
    #[serde(rename = "@Name")]
    name: &'static str,
}
