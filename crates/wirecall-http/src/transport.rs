//! reqwest-backed implementations of the transport capability.

use async_trait::async_trait;
use bytes::Bytes;
use wirecall_core::{AsyncTransport, Transport};
use wirecall_model::{FilePart, TransportError, WireBody, WireRequest, WireResponse};

/// Content type sent with URL-encoded form bodies.
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

fn map_reqwest_error(e: &reqwest::Error) -> TransportError {
    if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else if e.is_timeout() {
        TransportError::Timeout(e.to_string())
    } else {
        TransportError::Protocol(e.to_string())
    }
}

fn convert_method(method: &http::Method) -> Result<reqwest::Method, TransportError> {
    reqwest::Method::from_bytes(method.as_str().as_bytes())
        .map_err(|e| TransportError::Protocol(format!("invalid method: {e}")))
}

/// Rebuild the response header map through string names and raw values, so
/// the engine stays independent of the `http` version reqwest links.
fn convert_headers(headers: &reqwest::header::HeaderMap) -> http::HeaderMap {
    let mut converted = http::HeaderMap::new();
    for (name, value) in headers {
        let Ok(name) = http::header::HeaderName::from_bytes(name.as_str().as_bytes()) else {
            continue;
        };
        let Ok(value) = http::header::HeaderValue::from_bytes(value.as_bytes()) else {
            continue;
        };
        converted.append(name, value);
    }
    converted
}

fn convert_status(status: reqwest::StatusCode) -> http::StatusCode {
    http::StatusCode::from_u16(status.as_u16()).unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR)
}

/// Assemble the `Cookie` header value from the request's cookie pairs.
fn cookie_header(cookies: &[(String, String)]) -> String {
    cookies
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Encode a URL-encoded form body, preserving field order.
fn encode_form(fields: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish()
}

/// A suspending transport over a shared [`reqwest::Client`].
///
/// The client handle is long-lived, so repeated calls reuse pooled
/// connections.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Create a transport with a fresh client bound to `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Wrap an externally configured client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: normalize(base_url.into()),
        }
    }

    fn build(
        &self,
        request: WireRequest,
    ) -> Result<reqwest::RequestBuilder, TransportError> {
        let method = convert_method(&request.method)?;
        let mut builder = self.client.request(method, &request.url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if !request.cookies.is_empty() {
            builder = builder.header(reqwest::header::COOKIE, cookie_header(&request.cookies));
        }

        builder = match request.body {
            WireBody::Empty => builder,
            WireBody::Json(value) => builder.json(&value),
            WireBody::Form(fields) => builder
                .header(reqwest::header::CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(encode_form(&fields)),
            WireBody::Multipart { fields, files } => {
                let mut form = reqwest::multipart::Form::new();
                for (name, value) in fields {
                    form = form.text(name, value);
                }
                for file in files {
                    form = form.part(file.name.clone(), multipart_part(file)?);
                }
                builder.multipart(form)
            }
        };

        Ok(builder)
    }
}

fn multipart_part(file: FilePart) -> Result<reqwest::multipart::Part, TransportError> {
    let filename = file.filename.unwrap_or_else(|| file.name.clone());
    let mut part = reqwest::multipart::Part::bytes(file.content.to_vec()).file_name(filename);
    if let Some(media_type) = &file.media_type {
        part = part
            .mime_str(media_type)
            .map_err(|e| TransportError::Protocol(format!("invalid part media type: {e}")))?;
    }
    Ok(part)
}

#[async_trait]
impl AsyncTransport for ReqwestTransport {
    async fn execute(&self, request: WireRequest) -> Result<WireResponse, TransportError> {
        let builder = self.build(request)?;
        let response = builder.send().await.map_err(|e| map_reqwest_error(&e))?;

        let status = convert_status(response.status());
        let headers = convert_headers(response.headers());
        let body: Bytes = response.bytes().await.map_err(|e| map_reqwest_error(&e))?;

        Ok(WireResponse::new(status, headers, body))
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// A blocking transport over a shared [`reqwest::blocking::Client`].
#[derive(Debug, Clone)]
pub struct BlockingTransport {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl BlockingTransport {
    /// Create a transport with a fresh client bound to `base_url`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the underlying client cannot be
    /// constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| map_reqwest_error(&e))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Wrap an externally configured client.
    #[must_use]
    pub fn with_client(client: reqwest::blocking::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: normalize(base_url.into()),
        }
    }

    fn build(
        &self,
        request: WireRequest,
    ) -> Result<reqwest::blocking::RequestBuilder, TransportError> {
        let method = convert_method(&request.method)?;
        let mut builder = self.client.request(method, &request.url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if !request.cookies.is_empty() {
            builder = builder.header(reqwest::header::COOKIE, cookie_header(&request.cookies));
        }

        builder = match request.body {
            WireBody::Empty => builder,
            WireBody::Json(value) => builder.json(&value),
            WireBody::Form(fields) => builder
                .header(reqwest::header::CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(encode_form(&fields)),
            WireBody::Multipart { fields, files } => {
                let mut form = reqwest::blocking::multipart::Form::new();
                for (name, value) in fields {
                    form = form.text(name, value);
                }
                for file in files {
                    form = form.part(file.name.clone(), blocking_multipart_part(file)?);
                }
                builder.multipart(form)
            }
        };

        Ok(builder)
    }
}

fn blocking_multipart_part(
    file: FilePart,
) -> Result<reqwest::blocking::multipart::Part, TransportError> {
    let filename = file.filename.unwrap_or_else(|| file.name.clone());
    let mut part =
        reqwest::blocking::multipart::Part::bytes(file.content.to_vec()).file_name(filename);
    if let Some(media_type) = &file.media_type {
        part = part
            .mime_str(media_type)
            .map_err(|e| TransportError::Protocol(format!("invalid part media type: {e}")))?;
    }
    Ok(part)
}

impl Transport for BlockingTransport {
    fn execute(&self, request: WireRequest) -> Result<WireResponse, TransportError> {
        let builder = self.build(request)?;
        let response = builder.send().map_err(|e| map_reqwest_error(&e))?;

        let status = convert_status(response.status());
        let headers = convert_headers(response.headers());
        let body: Bytes = response.bytes().map_err(|e| map_reqwest_error(&e))?;

        Ok(WireResponse::new(status, headers, body))
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn normalize(url: String) -> String {
    url.trim_end_matches('/').to_owned()
}
