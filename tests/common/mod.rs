use pxorder::application::client::OrderGatewayClient;
use pxorder::domain::config::GatewayConfig;
use pxorder::domain::ports::SoapResponse;
use pxorder::infrastructure::in_memory::InMemorySoapClient;

pub const INITIALIZE8_RESULT: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<payex>
  <header name="Payex Header v1.0">
    <id>9a1d2c</id>
  </header>
  <status>
    <code>OK</code>
    <errorCode>OK</errorCode>
  </status>
  <orderRef>51a8f2c0b7e34</orderRef>
  <redirectUrl>https://test-confined.payex.com/PxOrderCC.aspx?orderRef=51a8f2c0b7e34</redirectUrl>
</payex>"#;

pub const COMPLETE_RESULT: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<payex>
  <status>
    <code>OK</code>
  </status>
  <transactionStatus>0</transactionStatus>
  <orderStatus>0</orderStatus>
  <transactionNumber>40012345</transactionNumber>
</payex>"#;

/// A sandbox client wired to a scripted in-memory SOAP service.
pub async fn scripted_client() -> (OrderGatewayClient, InMemorySoapClient) {
    let soap = InMemorySoapClient::new();
    soap.respond_to(
        "Initialize8",
        SoapResponse::new().with_field("Initialize8Result", INITIALIZE8_RESULT),
    )
    .await;
    soap.respond_to(
        "Complete",
        SoapResponse::new().with_field("CompleteResult", COMPLETE_RESULT),
    )
    .await;

    let config = GatewayConfig::new("123", "secret", true).unwrap();
    let client = OrderGatewayClient::new(Box::new(soap.clone()), config).unwrap();
    (client, soap)
}
