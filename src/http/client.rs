use reqwest::{
    Client,
    header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
    redirect,
};

use crate::args::DEFAULT_USER_AGENT;
use crate::config::ClientSettings;
use crate::error::{AppError, AppResult, HttpError};

pub(crate) const SOAP_ACTION_HEADER: &str = "soapaction";

/// Builds the shared HTTP client used by every request of a run.
///
/// # Errors
///
/// Returns an error when a header is invalid or the client cannot be built.
pub fn build_client(settings: &ClientSettings) -> AppResult<Client> {
    let headers = build_headers(settings)?;

    let mut client_builder = Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .default_headers(headers)
        .connect_timeout(settings.connect_timeout)
        .redirect(redirect::Policy::none());

    if let Some(timeout) = settings.request_timeout {
        client_builder = client_builder.timeout(timeout);
    }

    client_builder
        .build()
        .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))
}

pub(super) fn build_headers(settings: &ClientSettings) -> Result<HeaderMap, HttpError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        header_value(CONTENT_TYPE.as_str(), &settings.content_type)?,
    );
    headers.insert(
        HeaderName::from_static(SOAP_ACTION_HEADER),
        header_value(SOAP_ACTION_HEADER, &settings.soap_action)?,
    );

    // The first user header of a name replaces the default; repeats are appended.
    let mut user_names: Vec<HeaderName> = Vec::new();
    for (name, value) in &settings.headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|err| HttpError::InvalidHeaderName {
                name: name.clone(),
                source: err,
            })?;
        let value = header_value(name, value)?;
        if user_names.contains(&header_name) {
            headers.append(header_name, value);
        } else {
            user_names.push(header_name.clone());
            headers.insert(header_name, value);
        }
    }

    Ok(headers)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, HttpError> {
    HeaderValue::from_str(value).map_err(|err| HttpError::InvalidHeaderValue {
        name: name.to_owned(),
        source: err,
    })
}
