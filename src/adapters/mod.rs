// Adapters layer: concrete implementations for external systems (http, storage, html output).

pub mod http;
pub mod render;
pub mod storage;
