// Adapters layer: concrete implementations for external systems (HTTP APIs, storage).

pub mod ffscouter;
pub mod http;
pub mod storage;
pub mod torn;
