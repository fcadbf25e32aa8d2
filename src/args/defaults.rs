pub(crate) const DEFAULT_USER_AGENT: &str = concat!("soapcharge/", env!("CARGO_PKG_VERSION"));

pub(crate) const DEFAULT_URL: &str = "http://example.com";
pub(crate) const DEFAULT_FILE: &str = "soap.xml";
/// Largest payload file accepted, in bytes.
pub(crate) const DEFAULT_MAX_PAYLOAD_SIZE: &str = "100000";
pub(crate) const DEFAULT_CONNECT_TIMEOUT: &str = "15s";
pub(crate) const DEFAULT_CONTENT_TYPE: &str = "text/xml;charset=UTF-8";
/// An empty quoted SOAP action, i.e. the header line `SOAPAction: ""`.
pub(crate) const DEFAULT_SOAP_ACTION: &str = "\"\"";
