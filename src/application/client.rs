use crate::domain::config::GatewayConfig;
use crate::domain::endpoint::pxorder_wsdl;
use crate::domain::hash::calculate_hash;
use crate::domain::operation::Operation;
use crate::domain::parameters::CallParameters;
use crate::domain::ports::SoapClientBox;
use crate::domain::response::GatewayResponse;
use crate::error::{GatewayError, Result};
use crate::infrastructure::xml;
use tracing::{debug, info, instrument};

/// Client for the PayEx PxOrder order API.
///
/// Each call signs the caller's parameters with the merchant account number
/// and the request hash, sends them through the injected
/// [`SoapClient`](crate::domain::ports::SoapClient) and decodes the XML
/// payload of the result.
pub struct OrderGatewayClient {
    soap: SoapClientBox,
    config: GatewayConfig,
}

impl OrderGatewayClient {
    /// Creates a new `OrderGatewayClient`.
    ///
    /// # Arguments
    ///
    /// * `soap` - The transport used to reach the PxOrder service.
    /// * `config` - Merchant credentials and environment; rejected with
    ///   [`GatewayError::InvalidConfig`] when incomplete.
    pub fn new(soap: SoapClientBox, config: GatewayConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { soap, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn wsdl_url(&self) -> &'static str {
        pxorder_wsdl(self.config.sandbox)
    }

    /// Starts a new order.
    ///
    /// See <http://www.payexpim.com/technical-reference/pxorder/initialize8/>.
    pub async fn initialize8(&self, parameters: CallParameters) -> Result<GatewayResponse> {
        self.invoke(Operation::Initialize8, parameters).await
    }

    /// Fetches the outcome of an order after the payer returns.
    ///
    /// See <http://www.payexpim.com/technical-reference/pxorder/complete-2/>.
    pub async fn complete(&self, parameters: CallParameters) -> Result<GatewayResponse> {
        self.invoke(Operation::Complete, parameters).await
    }

    /// Returns the parameters exactly as `initialize8` would send them.
    pub fn prepare_initialize8(&self, parameters: CallParameters) -> CallParameters {
        self.prepare(Operation::Initialize8, parameters)
    }

    /// Returns the parameters exactly as `complete` would send them.
    pub fn prepare_complete(&self, parameters: CallParameters) -> CallParameters {
        self.prepare(Operation::Complete, parameters)
    }

    fn prepare(&self, operation: Operation, mut parameters: CallParameters) -> CallParameters {
        parameters.set("accountNumber", self.config.account_number.as_str());
        let hash = calculate_hash(
            &parameters,
            operation.hash_fields(),
            &self.config.encryption_key,
        );
        parameters.set("hash", hash);
        parameters
    }

    #[instrument(skip(self, operation, parameters), fields(operation = operation.name(), sandbox = self.config.sandbox))]
    async fn invoke(
        &self,
        operation: Operation,
        parameters: CallParameters,
    ) -> Result<GatewayResponse> {
        let parameters = self.prepare(operation, parameters);
        let response = self
            .soap
            .call(self.wsdl_url(), operation.name(), &parameters)
            .await?;

        for diagnostic in &response.diagnostics {
            debug!(%diagnostic, "ignoring transport diagnostic");
        }

        let result_field = operation.result_field();
        let payload = response.field(&result_field).ok_or_else(|| {
            GatewayError::ResponseParse(format!("response has no {result_field} field"))
        })?;

        let tree = xml::parse_document(payload)?;
        info!("PxOrder call completed");
        Ok(tree)
    }
}
