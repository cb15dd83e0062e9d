//! 基础设施层
//!
//! 持有稀缺资源（HTTP 连接池、令牌缓存），只暴露能力

pub mod http_transport;
pub mod token_cache;

pub use http_transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError,
};
pub use token_cache::TokenCache;
