// Search criterion shared by the availability and hotel search requests
use chrono::NaiveDate;
use serde::Serialize;

use crate::request::{require, to_xml, RequestError};

// Operation name reported when the fragment is generated on its own
const FRAGMENT: &str = "Criterion";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    Rating,
    Price,
}

impl OrderBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::Rating => "rating",
            OrderBy::Price => "price",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StayDateRange {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
    // length of stay in nights
    pub duration: Option<u32>,
}

impl StayDateRange {
    pub fn new(start: NaiveDate) -> Self {
        Self {
            start,
            end: None,
            duration: None,
        }
    }

    pub fn until(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    pub fn nights(mut self, nights: u32) -> Self {
        self.duration = Some(nights);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub country_code: String,
    pub country_name: Option<String>,
    pub city_name: String,
    pub state_code: Option<String>,
    pub state_name: Option<String>,
}

impl Address {
    pub fn new(country_code: impl Into<String>, city_name: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            city_name: city_name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomStayCandidate {
    pub room_type_code: String,
    pub quantity: u32,
}

impl RoomStayCandidate {
    pub fn new(room_type_code: impl Into<String>, quantity: u32) -> Self {
        Self {
            room_type_code: room_type_code.into(),
            quantity,
        }
    }
}

/// Parameters rendered into a `<Criterion>` element.
///
/// Every field is optional. Absent fields are left out of the document entirely:
/// the server rejects empty attributes, so nothing is ever zero-filled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriterionParams {
    pub stay_date_range: Option<StayDateRange>,
    pub address: Option<Address>,
    pub hotel_city_code: Option<String>,
    pub segment_category_code: Option<String>,
    pub property_class_code: Option<String>,
    pub hotel_code: Option<String>,
    pub room_stay_candidates: Vec<RoomStayCandidate>,
    pub order_by: Option<OrderBy>,
}

impl CriterionParams {
    // Serialize the criterion on its own, as a standalone fragment
    pub fn generate(&self) -> Result<String, RequestError> {
        self.validate(FRAGMENT)?;
        to_xml(&self.to_xml())
    }

    // Address and room candidates render required attributes, which may not be blank
    pub fn validate(&self, operation: &'static str) -> Result<(), RequestError> {
        if let Some(address) = &self.address {
            require(operation, "CountryName", &address.country_code)?;
            require(operation, "CityName", &address.city_name)?;
        }
        self.room_stay_candidates.iter().try_for_each(|candidate| {
            require(operation, "RoomTypeCode", &candidate.room_type_code)
        })
    }

    pub(crate) fn to_xml(&self) -> XmlCriterion<'_> {
        XmlCriterion {
            hotel_ref: XmlHotelRef {
                segment_category_code: non_empty(&self.segment_category_code),
                property_class_code: non_empty(&self.property_class_code),
                hotel_code: non_empty(&self.hotel_code),
                hotel_city_code: non_empty(&self.hotel_city_code),
            },
            stay_date_range: self.stay_date_range.as_ref().map(|range| XmlStayDateRange {
                start: range.start.to_string(),
                end: range.end.map(|end| end.to_string()),
                duration: range.duration.map(format_duration),
            }),
            address: self.address.as_ref().map(|address| XmlAddress {
                country_name: XmlCountryName {
                    code: &address.country_code,
                    name: non_empty(&address.country_name),
                },
                city_name: &address.city_name,
                state_prov: state_prov(address),
            }),
            room_stay_candidates: if self.room_stay_candidates.is_empty() {
                None
            } else {
                Some(XmlRoomStayCandidates {
                    candidates: self
                        .room_stay_candidates
                        .iter()
                        .map(|candidate| XmlRoomStayCandidate {
                            room_type_code: &candidate.room_type_code,
                            quantity: candidate.quantity,
                        })
                        .collect(),
                })
            },
            tpa_extensions: self.order_by.map(|order_by| XmlOrderByExtension {
                order_by: XmlOrderBy {
                    value: order_by.as_str(),
                },
            }),
        }
    }
}

// Stay length in the protocol's period notation, nights only
pub fn format_duration(nights: u32) -> String {
    format!("P{}N", nights)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn state_prov(address: &Address) -> Option<XmlStateProv<'_>> {
    let code = non_empty(&address.state_code);
    let name = non_empty(&address.state_name);
    if code.is_none() && name.is_none() {
        return None;
    }

    Some(XmlStateProv {
        state_code: code,
        name: name.or(code),
    })
}

// Structures for XML serialization
#[derive(Debug, Serialize)]
#[serde(rename = "Criterion", rename_all = "PascalCase")]
pub(crate) struct XmlCriterion<'a> {
    hotel_ref: XmlHotelRef<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stay_date_range: Option<XmlStayDateRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<XmlAddress<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    room_stay_candidates: Option<XmlRoomStayCandidates<'a>>,
    #[serde(rename = "TPA_Extensions", skip_serializing_if = "Option::is_none")]
    tpa_extensions: Option<XmlOrderByExtension>,
}

#[derive(Debug, Serialize)]
struct XmlHotelRef<'a> {
    #[serde(rename = "@SegmentCategoryCode", skip_serializing_if = "Option::is_none")]
    segment_category_code: Option<&'a str>,
    #[serde(rename = "@PropertyClassCode", skip_serializing_if = "Option::is_none")]
    property_class_code: Option<&'a str>,
    #[serde(rename = "@HotelCode", skip_serializing_if = "Option::is_none")]
    hotel_code: Option<&'a str>,
    #[serde(rename = "@HotelCityCode", skip_serializing_if = "Option::is_none")]
    hotel_city_code: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct XmlStayDateRange {
    #[serde(rename = "@Start")]
    start: String,
    #[serde(rename = "@End", skip_serializing_if = "Option::is_none")]
    end: Option<String>,
    #[serde(rename = "@Duration", skip_serializing_if = "Option::is_none")]
    duration: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlAddress<'a> {
    country_name: XmlCountryName<'a>,
    city_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    state_prov: Option<XmlStateProv<'a>>,
}

#[derive(Debug, Serialize)]
struct XmlCountryName<'a> {
    #[serde(rename = "@Code")]
    code: &'a str,
    #[serde(rename = "$text", skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct XmlStateProv<'a> {
    #[serde(rename = "@StateCode", skip_serializing_if = "Option::is_none")]
    state_code: Option<&'a str>,
    #[serde(rename = "$text", skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct XmlRoomStayCandidates<'a> {
    #[serde(rename = "RoomStayCandidate")]
    candidates: Vec<XmlRoomStayCandidate<'a>>,
}

#[derive(Debug, Serialize)]
struct XmlRoomStayCandidate<'a> {
    #[serde(rename = "@RoomTypeCode")]
    room_type_code: &'a str,
    #[serde(rename = "@Quantity")]
    quantity: u32,
}

#[derive(Debug, Serialize)]
struct XmlOrderByExtension {
    #[serde(rename = "OrderBy")]
    order_by: XmlOrderBy,
}

#[derive(Debug, Serialize)]
struct XmlOrderBy {
    #[serde(rename = "@Value")]
    value: &'static str,
}
