mod header_error;
mod header_fields;
mod header_pool;
mod request_header;
mod response_header;

pub use header_error::{HeaderDecodeError, HeaderEncodeError};
pub use header_pool::{
    HeaderPool, PooledHeader, REQUEST_HEADER_POOL, RESPONSE_HEADER_POOL, ResetHeader,
};
pub use request_header::RequestHeader;
pub use response_header::ResponseHeader;
