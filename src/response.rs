// Response pipeline: parse, classify protocol errors, normalize
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::normalize::{strip_namespace_attributes, CanonicalRecord, Normalizer, TreeNormalizer, VALUE_KEY};
use crate::tree::{parse, ParsedDocument};

// Root element of a high level error response
pub const ERROR_ROOT: &str = "OTA_ErrorRS";

// ErrorType given to high level errors
pub const HIGH_LEVEL_ERROR_TYPE: &str = "0";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    #[serde(rename = "ErrorCode")]
    pub code: String,
    #[serde(rename = "ErrorType", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(rename = "ErrorMessage")]
    pub message: String,
    #[serde(rename = "TimeStamp", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(rename = "Status", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessingError {
    #[error("XML parsing error: {0}")]
    XmlParseError(String),

    #[error("High level error {}: {}", .0.code, .0.message)]
    HighLevel(ErrorRecord),

    #[error("Response contains {} data error(s)", .0.len())]
    DataErrors(Vec<ErrorRecord>),

    #[error("Response contains {} warning(s)", .0.len())]
    Warnings(Vec<ErrorRecord>),
}

impl ProcessingError {
    // Error records carried by the protocol level variants
    pub fn errors(&self) -> &[ErrorRecord] {
        match self {
            ProcessingError::XmlParseError(_) => &[],
            ProcessingError::HighLevel(record) => std::slice::from_ref(record),
            ProcessingError::DataErrors(records) | ProcessingError::Warnings(records) => records,
        }
    }
}

/// Authentication failures and rejected requests come back under a dedicated
/// root element, described entirely by its attributes.
pub fn classify_high_level(document: &ParsedDocument) -> Option<ProcessingError> {
    if document.root_name != ERROR_ROOT {
        return None;
    }

    let root = &document.root;
    let attribute = |name: &str| root.attribute(name).map(str::to_string);
    Some(ProcessingError::HighLevel(ErrorRecord {
        code: attribute("ErrorCode").unwrap_or_default(),
        error_type: Some(HIGH_LEVEL_ERROR_TYPE.to_string()),
        message: attribute("ErrorMessage").unwrap_or_default(),
        timestamp: attribute("TimeStamp"),
        status: attribute("Status"),
    }))
}

/// Errors and warnings embedded in an otherwise well formed response.
/// Errors win over warnings; warnings are never treated as partial success.
pub fn classify_embedded(record: &CanonicalRecord) -> Option<ProcessingError> {
    if let Some(errors) = record.get("Errors") {
        return Some(ProcessingError::DataErrors(collect_records(errors, "Error")));
    }
    if let Some(warnings) = record.get("Warnings") {
        return Some(ProcessingError::Warnings(collect_records(warnings, "Warning")));
    }
    None
}

// Entries are either the records themselves or containers of `entry_tag`
fn collect_records(collection: &CanonicalRecord, entry_tag: &str) -> Vec<ErrorRecord> {
    collection
        .items()
        .iter()
        .flat_map(|entry| match entry.get(entry_tag) {
            Some(nested) => nested.items().to_vec(),
            None => vec![entry.clone()],
        })
        .filter_map(|entry| to_error_record(&entry))
        .collect()
}

fn to_error_record(entry: &CanonicalRecord) -> Option<ErrorRecord> {
    if let Some(text) = entry.as_text() {
        if text.is_empty() {
            return None;
        }
        return Some(ErrorRecord {
            message: text.to_string(),
            ..Default::default()
        });
    }

    let field = |names: &[&str]| {
        names
            .iter()
            .find_map(|name| entry.get(name).and_then(CanonicalRecord::as_text))
            .map(str::to_string)
    };
    Some(ErrorRecord {
        code: field(&["Code", "ErrorCode"]).unwrap_or_default(),
        error_type: field(&["Type", "ErrorType"]),
        message: field(&[VALUE_KEY, "ShortText", "ErrorMessage"]).unwrap_or_default(),
        timestamp: field(&["TimeStamp"]),
        status: field(&["Status"]),
    })
}

/// Turns raw response text into a canonical record or a classified error.
#[derive(Debug, Clone, Default)]
pub struct ResponseProcessor<N: Normalizer = TreeNormalizer> {
    normalizer: N,
}

impl ResponseProcessor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<N: Normalizer> ResponseProcessor<N> {
    pub fn with_normalizer(normalizer: N) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &N {
        &self.normalizer
    }

    pub fn process(&self, xml: &str) -> Result<CanonicalRecord, ProcessingError> {
        let document = parse(xml)?;
        self.process_document(&document)
    }

    pub fn process_document(
        &self,
        document: &ParsedDocument,
    ) -> Result<CanonicalRecord, ProcessingError> {
        debug!(root = %document.root_name, "Processing response");

        if let Some(error) = classify_high_level(document) {
            warn!(root = %document.root_name, error = %error, "High level error response");
            return Err(error);
        }

        let record = self.normalizer.normalize(&document.root);
        if let Some(error) = classify_embedded(&record) {
            warn!(
                root = %document.root_name,
                count = error.errors().len(),
                error = %error,
                "Response carries embedded errors"
            );
            return Err(error);
        }

        Ok(strip_namespace_attributes(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::GenericNode;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingNormalizer {
        calls: AtomicUsize,
    }

    impl Normalizer for CountingNormalizer {
        fn normalize(&self, node: &GenericNode) -> CanonicalRecord {
            self.calls.fetch_add(1, Ordering::SeqCst);
            TreeNormalizer.normalize(node)
        }
    }

    const INVALID_SITE_ID: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <OTA_ErrorRS ErrorCode="448" ErrorMessage="Invalid SiteID" Status="Fatal"/>"#;

    #[test]
    fn test_high_level_error_skips_normalization() {
        let processor = ResponseProcessor::with_normalizer(CountingNormalizer::default());
        let error = processor.process(INVALID_SITE_ID).unwrap_err();

        assert_eq!(
            error,
            ProcessingError::HighLevel(ErrorRecord {
                code: "448".to_string(),
                error_type: Some("0".to_string()),
                message: "Invalid SiteID".to_string(),
                timestamp: None,
                status: Some("Fatal".to_string()),
            })
        );
        assert_eq!(processor.normalizer().calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            serde_json::to_value(&error.errors()[0]).unwrap(),
            json!({
                "ErrorCode": "448",
                "ErrorType": "0",
                "ErrorMessage": "Invalid SiteID",
                "Status": "Fatal"
            })
        );
    }

    #[test]
    fn test_errors_mask_warnings() {
        let xml = r#"<OTA_HotelAvailRS Version="1.006">
            <Errors>
                <Error Type="3" Code="15">Invalid date range</Error>
                <Error Type="3" Code="61">Invalid currency</Error>
            </Errors>
            <Warnings>
                <Warning Type="1" Code="1">Ignored</Warning>
            </Warnings>
        </OTA_HotelAvailRS>"#;

        let processor = ResponseProcessor::with_normalizer(CountingNormalizer::default());
        match processor.process(xml) {
            Err(ProcessingError::DataErrors(errors)) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].code, "15");
                assert_eq!(errors[0].error_type.as_deref(), Some("3"));
                assert_eq!(errors[0].message, "Invalid date range");
                assert_eq!(errors[1].code, "61");
            }
            other => panic!("expected data errors, got {:?}", other),
        }
        assert_eq!(processor.normalizer().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_warnings_are_failures() {
        let xml = r#"<OTA_HotelSearchRS>
            <Success/>
            <Warnings><Warning Type="1" ShortText="No availability"/></Warnings>
        </OTA_HotelSearchRS>"#;

        let error = ResponseProcessor::new().process(xml).unwrap_err();
        assert_eq!(
            error,
            ProcessingError::Warnings(vec![ErrorRecord {
                error_type: Some("1".to_string()),
                message: "No availability".to_string(),
                ..Default::default()
            }])
        );
    }

    #[test]
    fn test_errors_given_as_direct_entries() {
        let xml = r#"<OTA_HotelDescriptiveInfoRS>
            <Errors ErrorCode="392" ErrorType="3">Invalid hotel code</Errors>
        </OTA_HotelDescriptiveInfoRS>"#;

        let error = ResponseProcessor::new().process(xml).unwrap_err();
        assert_eq!(error.errors().len(), 1);
        assert_eq!(error.errors()[0].code, "392");
        assert_eq!(error.errors()[0].message, "Invalid hotel code");
    }

    #[test]
    fn test_empty_errors_element_still_fails() {
        let xml = "<OTA_ReadRS><Errors/></OTA_ReadRS>";
        assert_eq!(
            ResponseProcessor::new().process(xml),
            Err(ProcessingError::DataErrors(Vec::new()))
        );
    }

    #[test]
    fn test_success_strips_namespaces() {
        let xml = r#"<OTA_CancelRS xmlns="http://www.opentravel.org/OTA/2003/05"
            xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
            xsi:schemaLocation="http://www.opentravel.org/OTA/2003/05 OTA_CancelRS.xsd"
            Version="1.001" Status="Cancelled">
            <Success/>
            <UniqueID Type="14" ID="9999999999"/>
        </OTA_CancelRS>"#;

        let record = ResponseProcessor::new().process(xml).unwrap();
        assert_eq!(
            record.to_json(),
            json!({
                "Version": "1.001",
                "Status": "Cancelled",
                "Success": "",
                "UniqueID": [{ "Type": "14", "ID": "9999999999" }]
            })
        );
    }

    #[test]
    fn test_malformed_response() {
        let processor = ResponseProcessor::with_normalizer(CountingNormalizer::default());
        assert!(matches!(
            processor.process("<OTA_ReadRS><Success></OTA_ReadRS>"),
            Err(ProcessingError::XmlParseError(_))
        ));
        assert_eq!(processor.normalizer().calls.load(Ordering::SeqCst), 0);
    }
}
