use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Remote call error: {0}")]
    RemoteCall(String),
    #[error("Response parse error: {0}")]
    ResponseParse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for GatewayError {
    fn from(err: quick_xml::Error) -> Self {
        Self::ResponseParse(err.to_string())
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::RemoteCall(format!("request timed out: {err}"))
        } else {
            Self::RemoteCall(err.to_string())
        }
    }
}
