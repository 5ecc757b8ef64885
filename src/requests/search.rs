use serde::Serialize;

use crate::config::{SearchOptions, SessionConfig};
use crate::criterion::{CriterionParams, XmlCriterion};
use crate::request::{to_xml, OtaRequest, RequestError};

const METHOD: &str = "OTA_HotelSearchRQ";

// Hotel search by location, category and class
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    pub criteria: CriterionParams,
    pub options: SearchOptions,
}

impl SearchRequest {
    pub fn new(criteria: CriterionParams) -> Self {
        Self {
            criteria,
            options: SearchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }
}

impl OtaRequest for SearchRequest {
    fn method_name(&self) -> &'static str {
        METHOD
    }

    fn version(&self) -> &'static str {
        "1.003"
    }

    fn echo_token(&self) -> bool {
        false
    }

    fn validate(&self) -> Result<(), RequestError> {
        self.criteria.validate(METHOD)
    }

    fn root_attributes(&self, _config: &SessionConfig) -> Vec<(&'static str, String)> {
        vec![("MaxResponses", self.options.limit.to_string())]
    }

    fn body(&self, _config: &SessionConfig) -> Result<String, RequestError> {
        to_xml(&XmlCriteria {
            available_only: self.options.available_only,
            criterion: self.criteria.to_xml(),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename = "Criteria")]
struct XmlCriteria<'a> {
    #[serde(rename = "@AvailableOnlyIndicator")]
    available_only: bool,
    #[serde(rename = "Criterion")]
    criterion: XmlCriterion<'a>,
}
