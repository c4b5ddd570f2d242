use super::xml;
use crate::domain::parameters::CallParameters;
use crate::domain::ports::{SoapClient, SoapResponse};
use crate::domain::response::GatewayResponse;
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use quick_xml::escape::escape;
use reqwest::header::{CONTENT_TYPE, WARNING};
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

pub const PXORDER_NAMESPACE: &str = "http://external.payex.com/PxOrder/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// SOAP 1.1 client for PxOrder operations over HTTPS.
///
/// The operation namespace is fixed, so the WSDL document itself is never
/// fetched; only its location is used to derive the service URL.
#[derive(Clone)]
pub struct HttpSoapClient {
    client: Client,
}

impl HttpSoapClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self::with_client(client))
    }

    /// Uses a caller-configured `reqwest` client (proxies, TLS roots).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SoapClient for HttpSoapClient {
    #[instrument(skip(self, parameters), fields(parameter_count = parameters.len()))]
    async fn call(
        &self,
        wsdl_url: &str,
        operation: &str,
        parameters: &CallParameters,
    ) -> Result<SoapResponse> {
        let url = service_url(wsdl_url);
        let body = build_envelope(operation, parameters)?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", format!("\"{PXORDER_NAMESPACE}{operation}\""))
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let diagnostics: Vec<String> = response
            .headers()
            .get_all(WARNING)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect();
        let text = response.text().await?;
        debug!(%status, bytes = text.len(), "received SOAP response");

        let fields = parse_envelope(operation, status, &text)?;
        Ok(SoapResponse {
            fields,
            diagnostics,
        })
    }
}

/// Strips the `?wsdl` query from a WSDL location.
pub fn service_url(wsdl_url: &str) -> &str {
    wsdl_url
        .split_once('?')
        .map_or(wsdl_url, |(base, _)| base)
}

fn is_valid_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Renders the SOAP request envelope for `operation`.
pub fn build_envelope(operation: &str, parameters: &CallParameters) -> Result<String> {
    if !is_valid_element_name(operation) {
        return Err(GatewayError::RemoteCall(format!(
            "invalid operation name {operation:?}"
        )));
    }

    let mut body = String::new();
    for (name, value) in parameters.iter() {
        if !is_valid_element_name(name) {
            return Err(GatewayError::RemoteCall(format!(
                "invalid parameter name {name:?}"
            )));
        }
        let value = value.to_string();
        body.push_str(&format!("<{name}>{}</{name}>", escape(value.as_str())));
    }

    Ok(format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
<soap:Body>
<{operation} xmlns="{PXORDER_NAMESPACE}">{body}</{operation}>
</soap:Body>
</soap:Envelope>"#
    ))
}

/// Extracts the `*Result` fields of `<operation>Response` from a SOAP envelope.
///
/// Faults and failed HTTP statuses become [`GatewayError::RemoteCall`]; an
/// envelope that cannot be understood is a [`GatewayError::ResponseParse`].
pub fn parse_envelope(
    operation: &str,
    status: StatusCode,
    text: &str,
) -> Result<HashMap<String, String>> {
    let envelope = match xml::parse_document(text) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            return Err(GatewayError::RemoteCall(format!("HTTP status {status}")));
        }
        Err(err) => return Err(err),
    };

    let body = envelope
        .get("Body")
        .ok_or_else(|| GatewayError::ResponseParse("SOAP envelope has no Body".to_string()))?;

    if let Some(fault) = body.get("Fault") {
        let reason = fault
            .get("faultstring")
            .and_then(GatewayResponse::as_str)
            .unwrap_or("unspecified fault");
        return Err(GatewayError::RemoteCall(format!("SOAP fault: {reason}")));
    }
    if !status.is_success() {
        return Err(GatewayError::RemoteCall(format!("HTTP status {status}")));
    }

    let response_name = format!("{operation}Response");
    let GatewayResponse::Map(entries) = body.get(&response_name).ok_or_else(|| {
        GatewayError::ResponseParse(format!("SOAP body has no {response_name} element"))
    })?
    else {
        return Err(GatewayError::ResponseParse(format!(
            "{response_name} has no result elements"
        )));
    };

    let fields = entries
        .iter()
        .filter(|(name, _)| name.ends_with("Result"))
        .filter_map(|(name, value)| match value {
            GatewayResponse::Scalar(s) => Some((name.clone(), s.clone())),
            v if v.is_empty_map() => Some((name.clone(), String::new())),
            _ => None,
        })
        .collect();
    Ok(fields)
}
