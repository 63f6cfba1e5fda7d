pub mod client;
pub mod error;
pub mod service;
pub mod types;

pub use client::RecommendationClient;
pub use error::*;
pub use service::RecommendationService;
pub use types::{GenerateRequest, GenerateResponse, NO_RECOMMENDATIONS};
