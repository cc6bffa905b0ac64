pub mod http;
pub mod traits;
pub mod types;

pub use http::HttpBrokerageApi;
pub use traits::BrokerageApi;
pub use types::PageRequest;
