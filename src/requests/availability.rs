use serde::Serialize;

use crate::config::SessionConfig;
use crate::criterion::{CriterionParams, XmlCriterion};
use crate::request::{to_xml, OtaRequest, RequestError};

const METHOD: &str = "OTA_HotelAvailRQ";

// Room availability and rates for the hotels matching a criterion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailabilityRequest {
    pub criteria: CriterionParams,
}

impl AvailabilityRequest {
    pub fn new(criteria: CriterionParams) -> Self {
        Self { criteria }
    }
}

impl OtaRequest for AvailabilityRequest {
    fn method_name(&self) -> &'static str {
        METHOD
    }

    fn version(&self) -> &'static str {
        "1.006"
    }

    fn echo_token(&self) -> bool {
        false
    }

    fn validate(&self) -> Result<(), RequestError> {
        self.criteria.validate(METHOD)
    }

    fn root_attributes(&self, config: &SessionConfig) -> Vec<(&'static str, String)> {
        vec![
            ("RequestedCurrency", config.currency.clone()),
            ("AllowPartialAvail", "false".to_string()),
        ]
    }

    fn body(&self, _config: &SessionConfig) -> Result<String, RequestError> {
        to_xml(&XmlAvailRequestSegments {
            segment: XmlAvailRequestSegment {
                hotel_search_criteria: XmlHotelSearchCriteria {
                    criterion: self.criteria.to_xml(),
                },
            },
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename = "AvailRequestSegments")]
struct XmlAvailRequestSegments<'a> {
    #[serde(rename = "AvailRequestSegment")]
    segment: XmlAvailRequestSegment<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlAvailRequestSegment<'a> {
    hotel_search_criteria: XmlHotelSearchCriteria<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlHotelSearchCriteria<'a> {
    criterion: XmlCriterion<'a>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criterion::{RoomStayCandidate, StayDateRange};
    use crate::tree::parse;
    use chrono::NaiveDate;

    #[test]
    fn test_availability_document() {
        let criteria = CriterionParams {
            stay_date_range: Some(
                StayDateRange::new(NaiveDate::from_ymd_opt(2016, 10, 10).unwrap())
                    .until(NaiveDate::from_ymd_opt(2016, 10, 15).unwrap()),
            ),
            hotel_code: Some("5255".to_string()),
            room_stay_candidates: vec![RoomStayCandidate::new("1_66", 1)],
            ..Default::default()
        };
        let config = SessionConfig::new("315", "test").with_currency("EUR");

        let xml = AvailabilityRequest::new(criteria).build(&config).unwrap();
        let document = parse(&xml).unwrap();
        assert_eq!(document.root_name, "OTA_HotelAvailRQ");

        let root = &document.root;
        assert_eq!(root.attribute("Version"), Some("1.006"));
        assert_eq!(root.attribute("RequestedCurrency"), Some("EUR"));
        assert_eq!(root.attribute("AllowPartialAvail"), Some("false"));

        let criterion = root
            .child("AvailRequestSegments")
            .and_then(|n| n.child("AvailRequestSegment"))
            .and_then(|n| n.child("HotelSearchCriteria"))
            .and_then(|n| n.child("Criterion"))
            .unwrap();
        assert_eq!(
            criterion.child("HotelRef").unwrap().attribute("HotelCode"),
            Some("5255")
        );
        assert_eq!(
            criterion.child("StayDateRange").unwrap().attribute("End"),
            Some("2016-10-15")
        );
        assert_eq!(
            criterion
                .child("RoomStayCandidates")
                .unwrap()
                .children("RoomStayCandidate")
                .len(),
            1
        );
    }

    #[test]
    fn test_blank_room_type_is_never_built() {
        let request = AvailabilityRequest::new(CriterionParams {
            hotel_code: Some("5255".to_string()),
            room_stay_candidates: vec![RoomStayCandidate::new(" ", 1)],
            ..Default::default()
        });
        match request.build(&SessionConfig::default()) {
            Err(RequestError::MissingField { operation, field }) => {
                assert_eq!(operation, "OTA_HotelAvailRQ");
                assert_eq!(field, "RoomTypeCode");
            }
            other => panic!("expected missing field, got {:?}", other),
        }
    }
}
