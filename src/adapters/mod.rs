// Adapters layer: concrete implementations for external systems (http, host pages).

pub mod http;
pub mod page_source;
