pub mod client;
pub mod headers;
pub mod response;

pub use client::{FindQuery, OrthancClient};
pub use response::{is_binary_content_type, UpstreamResponse};
