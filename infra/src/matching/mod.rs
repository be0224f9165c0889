//! Clients for the external retina matching service

pub mod http;

pub use http::HttpMatchingGateway;
