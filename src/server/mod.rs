mod app;
mod error;
mod handlers;


pub use app::{router, ApiServer};
pub use error::ApiError;
