use crate::domain::parameters::CallParameters;
use crate::domain::ports::{SoapClient, SoapResponse};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A call observed by [`InMemorySoapClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub wsdl_url: String,
    pub operation: String,
    pub parameters: CallParameters,
}

#[derive(Debug, Clone)]
enum ScriptedReply {
    Respond(SoapResponse),
    Fail(String),
}

/// A scripted, in-process stand-in for a SOAP service.
///
/// Replies are configured per operation name and every call is recorded.
/// Clones share the same script and call log, so a clone can be handed to a
/// client while the original is kept for assertions.
#[derive(Default, Clone)]
pub struct InMemorySoapClient {
    replies: Arc<RwLock<HashMap<String, ScriptedReply>>>,
    calls: Arc<RwLock<Vec<RecordedCall>>>,
}

impl InMemorySoapClient {
    /// Creates a client with no scripted replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers every future call to `operation` with `response`.
    pub async fn respond_to(&self, operation: &str, response: SoapResponse) {
        let mut replies = self.replies.write().await;
        replies.insert(operation.to_string(), ScriptedReply::Respond(response));
    }

    /// Fails every future call to `operation` with a remote call error.
    pub async fn fail(&self, operation: &str, message: &str) {
        let mut replies = self.replies.write().await;
        replies.insert(operation.to_string(), ScriptedReply::Fail(message.to_string()));
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl SoapClient for InMemorySoapClient {
    async fn call(
        &self,
        wsdl_url: &str,
        operation: &str,
        parameters: &CallParameters,
    ) -> Result<SoapResponse> {
        self.calls.write().await.push(RecordedCall {
            wsdl_url: wsdl_url.to_string(),
            operation: operation.to_string(),
            parameters: parameters.clone(),
        });

        let replies = self.replies.read().await;
        match replies.get(operation) {
            Some(ScriptedReply::Respond(response)) => Ok(response.clone()),
            Some(ScriptedReply::Fail(message)) => Err(GatewayError::RemoteCall(message.clone())),
            None => Err(GatewayError::RemoteCall(format!(
                "no reply scripted for {operation}"
            ))),
        }
    }
}
