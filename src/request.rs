// Request building: the capability every OTA operation implements, plus the
// envelope and POS helpers they all share
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;
use serde::Serialize;
use thiserror::Error;

use crate::config::SessionConfig;
use crate::requests::{
    AvailabilityRequest, CancelReservationRequest, DescriptiveInfoRequest,
    ReadReservationRequest, ReservationRequest, SearchRequest,
};

pub const OTA_NAMESPACE: &str = "http://www.opentravel.org/OTA/2003/05";
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

// UniqueID type code meaning "reservation confirmation number"
pub const RESERVATION_CONFIRMATION_TYPE: &str = "14";

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Missing required field `{field}` for {operation}")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// One OTA operation that can be rendered into a complete request document.
///
/// Implementors describe their method name, version and body; [`OtaRequest::build`]
/// wraps the body into the shared envelope with [`build_envelope`].
pub trait OtaRequest {
    fn method_name(&self) -> &'static str;

    fn version(&self) -> &'static str;

    // Availability and search requests are sent without an echo token
    fn echo_token(&self) -> bool {
        true
    }

    fn validate(&self) -> Result<(), RequestError> {
        Ok(())
    }

    // Operation specific attributes of the root element
    fn root_attributes(&self, _config: &SessionConfig) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn body(&self, config: &SessionConfig) -> Result<String, RequestError>;

    fn build(&self, config: &SessionConfig) -> Result<String, RequestError> {
        self.validate()?;
        let body = self.body(config)?;
        build_envelope(self, config, &body)
    }
}

// Wrap a method body into the root element, with the POS block in front of it
pub fn build_envelope<R: OtaRequest + ?Sized>(
    request: &R,
    config: &SessionConfig,
    body: &str,
) -> Result<String, RequestError> {
    let method = request.method_name();
    let schema_location = format!("{} {}.xsd", OTA_NAMESPACE, method);
    let extra_attributes = request.root_attributes(config);

    let mut root = BytesStart::new(method);
    root.push_attribute(("xmlns", OTA_NAMESPACE));
    root.push_attribute(("xmlns:xsi", XSI_NAMESPACE));
    root.push_attribute(("xsi:schemaLocation", schema_location.as_str()));
    if request.echo_token() {
        root.push_attribute(("EchoToken", "1"));
    }
    root.push_attribute(("Target", target_attribute(config)));
    root.push_attribute(("Version", request.version()));
    root.push_attribute(("PrimaryLangID", config.language.as_str()));
    for (name, value) in &extra_attributes {
        root.push_attribute((*name, value.as_str()));
    }

    let pos = pos_block(config)?;

    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(writer_error)?;
    writer
        .write_event(Event::Start(root))
        .map_err(writer_error)?;
    // both fragments are serialized (and escaped) already
    writer
        .write_event(Event::Text(BytesText::from_escaped(pos.as_str())))
        .map_err(writer_error)?;
    writer
        .write_event(Event::Text(BytesText::from_escaped(body)))
        .map_err(writer_error)?;
    writer
        .write_event(Event::End(BytesEnd::new(method)))
        .map_err(writer_error)?;

    String::from_utf8(writer.into_inner()).map_err(|e| RequestError::Serialization(e.to_string()))
}

// Authentication header derived from the site id and password
pub fn pos_block(config: &SessionConfig) -> Result<String, RequestError> {
    to_xml(&XmlPos {
        source: XmlSource {
            requestor_id: XmlRequestorId {
                id: &config.site_id,
                message_password: &config.password,
            },
        },
    })
}

pub fn target_attribute(config: &SessionConfig) -> &'static str {
    config.target.as_str()
}

pub(crate) fn to_xml<T: Serialize>(value: &T) -> Result<String, RequestError> {
    quick_xml::se::to_string(value).map_err(|e| RequestError::Serialization(e.to_string()))
}

pub(crate) fn require(
    operation: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), RequestError> {
    if value.trim().is_empty() {
        return Err(RequestError::MissingField { operation, field });
    }
    Ok(())
}

fn writer_error<E: std::fmt::Display>(error: E) -> RequestError {
    RequestError::Serialization(error.to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename = "POS")]
struct XmlPos<'a> {
    #[serde(rename = "Source")]
    source: XmlSource<'a>,
}

#[derive(Debug, Serialize)]
struct XmlSource<'a> {
    #[serde(rename = "RequestorID")]
    requestor_id: XmlRequestorId<'a>,
}

#[derive(Debug, Serialize)]
struct XmlRequestorId<'a> {
    #[serde(rename = "@ID")]
    id: &'a str,
    #[serde(rename = "@MessagePassword")]
    message_password: &'a str,
}

/// Every request the client knows how to send, one variant per operation.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestSpec {
    DescriptiveInfo(DescriptiveInfoRequest),
    Availability(AvailabilityRequest),
    Search(SearchRequest),
    Reservation(ReservationRequest),
    ReadReservation(ReadReservationRequest),
    CancelReservation(CancelReservationRequest),
}

impl RequestSpec {
    pub fn as_request(&self) -> &dyn OtaRequest {
        match self {
            RequestSpec::DescriptiveInfo(request) => request,
            RequestSpec::Availability(request) => request,
            RequestSpec::Search(request) => request,
            RequestSpec::Reservation(request) => request,
            RequestSpec::ReadReservation(request) => request,
            RequestSpec::CancelReservation(request) => request,
        }
    }

    pub fn method_name(&self) -> &'static str {
        self.as_request().method_name()
    }

    // Root element the server answers with on success, e.g. OTA_ReadRQ -> OTA_ReadRS
    pub fn response_root(&self) -> String {
        let method = self.method_name();
        match method.strip_suffix("RQ") {
            Some(stem) => format!("{}RS", stem),
            None => method.to_string(),
        }
    }

    pub fn build(&self, config: &SessionConfig) -> Result<String, RequestError> {
        self.as_request().build(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Target;
    use crate::criterion::CriterionParams;
    use crate::tree::parse;

    fn config() -> SessionConfig {
        SessionConfig::new("315", "secret")
    }

    #[test]
    fn test_pos_block() {
        let pos = pos_block(&config()).unwrap();
        let document = parse(&pos).unwrap();
        assert_eq!(document.root_name, "POS");

        let requestor = document
            .root
            .child("Source")
            .and_then(|source| source.child("RequestorID"))
            .unwrap();
        assert_eq!(requestor.attribute("ID"), Some("315"));
        assert_eq!(requestor.attribute("MessagePassword"), Some("secret"));
    }

    #[test]
    fn test_envelope_attributes() {
        let request = RequestSpec::ReadReservation(ReadReservationRequest::new("9999999999"));
        let xml = request.build(&config()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));

        let document = parse(&xml).unwrap();
        assert_eq!(document.root_name, "OTA_ReadRQ");
        let root = &document.root;
        assert_eq!(root.attribute("xmlns"), Some(OTA_NAMESPACE));
        assert_eq!(root.attribute("xmlns:xsi"), Some(XSI_NAMESPACE));
        assert_eq!(
            root.attribute("xsi:schemaLocation"),
            Some("http://www.opentravel.org/OTA/2003/05 OTA_ReadRQ.xsd")
        );
        assert_eq!(root.attribute("EchoToken"), Some("1"));
        assert_eq!(root.attribute("Target"), Some("Test"));
        assert_eq!(root.attribute("Version"), Some("1.006"));
        assert_eq!(root.attribute("PrimaryLangID"), Some("en"));
        assert!(root.child("POS").is_some());
    }

    #[test]
    fn test_production_target_and_language() {
        let config = config()
            .with_target(Target::Production)
            .with_language("it");
        let request = RequestSpec::Availability(AvailabilityRequest::new(CriterionParams::default()));
        let document = parse(&request.build(&config).unwrap()).unwrap();
        assert_eq!(document.root.attribute("Target"), Some("Production"));
        assert_eq!(document.root.attribute("PrimaryLangID"), Some("it"));
        assert_eq!(document.root.attribute("EchoToken"), None);
    }

    #[test]
    fn test_credentials_are_escaped() {
        let config = SessionConfig::new("315", "p&ss\"word");
        let pos = pos_block(&config).unwrap();
        assert!(!pos.contains("p&ss"));

        let document = parse(&pos).unwrap();
        let requestor = document
            .root
            .child("Source")
            .and_then(|source| source.child("RequestorID"))
            .unwrap();
        assert_eq!(requestor.attribute("MessagePassword"), Some("p&ss\"word"));
    }

    #[test]
    fn test_response_root() {
        let request = RequestSpec::CancelReservation(CancelReservationRequest::new(
            "9999999999",
            "code",
        ));
        assert_eq!(request.method_name(), "OTA_CancelRQ");
        assert_eq!(request.response_root(), "OTA_CancelRS");
    }

    #[test]
    fn test_validation_runs_before_build() {
        let request = RequestSpec::ReadReservation(ReadReservationRequest::new(""));
        let result = request.build(&config());
        assert!(matches!(
            result,
            Err(RequestError::MissingField {
                operation: "OTA_ReadRQ",
                field: "UniqueID",
            })
        ));
    }
}
