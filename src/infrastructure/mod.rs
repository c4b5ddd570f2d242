//! Adapters for the SOAP port and the XML payload decoder.

pub mod http;
pub mod in_memory;
pub mod xml;
