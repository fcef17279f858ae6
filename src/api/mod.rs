pub mod handlers;
pub mod render;
pub mod request_meta;
pub mod routes;
pub mod service;

pub use handlers::*;
pub use request_meta::RequestMeta;
pub use routes::*;
pub use service::BoatService;
