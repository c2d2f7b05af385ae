pub mod echo;
pub mod http;

pub use echo::EchoTransport;
pub use http::HttpTransport;
