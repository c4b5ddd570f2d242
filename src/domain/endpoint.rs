pub const SANDBOX_WSDL: &str = "https://test-external.payex.com/pxorder/pxorder.asmx?wsdl";
pub const PRODUCTION_WSDL: &str = "https://external.payex.com/pxorder/pxorder.asmx?wsdl";

/// Selects the PxOrder WSDL location for the environment.
pub fn pxorder_wsdl(sandbox: bool) -> &'static str {
    if sandbox { SANDBOX_WSDL } else { PRODUCTION_WSDL }
}
