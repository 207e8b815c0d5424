pub mod engine;
pub mod http;
pub mod model;
pub mod observability;
pub mod seed;
pub mod wal;
