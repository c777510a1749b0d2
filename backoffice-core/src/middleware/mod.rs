pub mod http;

pub use http::{request_id_middleware, request_span, REQUEST_ID_HEADER};
