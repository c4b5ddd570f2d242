//! Application layer containing the PxOrder call orchestration.
//!
//! This module defines the `OrderGatewayClient`, the entry point for
//! initializing and completing orders. It signs parameters, dispatches them
//! through the injected SOAP port and decodes the returned payload.

pub mod client;
