//! Domain types for the PxOrder API: configuration, call parameters, the
//! request hash, endpoint selection and the generic response tree, plus the
//! port through which remote calls are made.

pub mod config;
pub mod endpoint;
pub mod hash;
pub mod operation;
pub mod parameters;
pub mod ports;
pub mod response;
