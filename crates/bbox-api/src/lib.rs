// bbox-api: Async Rust client for the Bbox router local management API

pub mod auth;
pub mod client;
pub mod device;
pub mod error;
pub mod hosts;
pub mod models;
pub mod normalize;
pub mod schema;
pub mod transport;
pub mod wan;

pub use auth::SessionState;
pub use client::{BboxClient, ClientConfig, Session, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{Error, ErrorKind};
pub use models::{Host, Record, Router, WanIpStats, WanStats};
pub use schema::{Problem, ValidationError, Violation};
pub use transport::TlsMode;
