use super::super::{HTTPError, http_client::HTTPClient, http_response::response_common::HTTPResponseType};
use strum_macros::Display;

/// HTTP methods used by the spacecraft backend.
#[derive(Debug, Clone, Copy)]
pub(crate) enum HTTPRequestMethod {
    Get,
    Put,
}

/// Shape of the parsed response of request `T`.
pub(crate) type ParsedResponse<T> = <<T as HTTPRequestType>::Response as HTTPResponseType>::ParsedResponseType;

pub(crate) trait HTTPRequestType {
    /// Type of the expected response.
    type Response: HTTPResponseType;
    /// `str` object representing the specific endpoint.
    fn endpoint(&self) -> &str;
    /// The corresponding HTTP Request Method.
    fn request_method(&self) -> HTTPRequestMethod;
    fn header_params(&self) -> reqwest::header::HeaderMap { reqwest::header::HeaderMap::default() }

    fn get_request_base(&self, client: &HTTPClient) -> reqwest::RequestBuilder {
        let url = format!("{}{}", client.url(), self.endpoint());
        let builder = match self.request_method() {
            HTTPRequestMethod::Get => client.client().get(url),
            HTTPRequestMethod::Put => client.client().put(url),
        };
        builder.headers(self.header_params())
    }
}

pub(crate) trait NoBodyHTTPRequestType: HTTPRequestType {
    async fn send_request(&self, client: &HTTPClient) -> Result<ParsedResponse<Self>, HTTPError> {
        let response = self.get_request_base(client).send().await?;
        Ok(Self::Response::read_response(response).await?)
    }
}

pub(crate) trait JSONBodyHTTPRequestType: HTTPRequestType {
    /// The type of the json body.
    type Body: serde::Serialize;
    /// Returns the serializable object.
    fn body(&self) -> &Self::Body;

    async fn send_request(&self, client: &HTTPClient) -> Result<ParsedResponse<Self>, HTTPError> {
        let response = self.get_request_base(client).json(self.body()).send().await?;
        Ok(Self::Response::read_response(response).await?)
    }
}

/// Failures before any response was received.
#[derive(Debug, Display)]
pub enum RequestError {
    /// No connection to the backend.
    Connect,
    /// The backend did not answer in time.
    Timeout,
    /// The request could not be built or encoded.
    Build,
    Unknown,
}

impl std::error::Error for RequestError {}

impl From<reqwest::Error> for RequestError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_connect() {
            RequestError::Connect
        } else if value.is_timeout() {
            RequestError::Timeout
        } else if value.is_builder() || value.is_body() {
            RequestError::Build
        } else {
            RequestError::Unknown
        }
    }
}
