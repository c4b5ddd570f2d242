use super::parameters::CallParameters;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Outcome of a remote SOAP operation.
///
/// `diagnostics` holds non-fatal notices raised by the transport while the
/// call still succeeded. They carry no bearing on the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoapResponse {
    pub fields: HashMap<String, String>,
    pub diagnostics: Vec<String>,
}

impl SoapResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostics.push(diagnostic.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Capability to invoke a named operation of a WSDL-described SOAP service.
#[async_trait]
pub trait SoapClient: Send + Sync {
    async fn call(
        &self,
        wsdl_url: &str,
        operation: &str,
        parameters: &CallParameters,
    ) -> Result<SoapResponse>;
}

pub type SoapClientBox = Box<dyn SoapClient>;
