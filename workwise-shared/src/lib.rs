pub mod types;
pub mod errors;
pub mod extract;
pub mod gateway;
pub mod middleware;
pub mod clients;

pub use types::*;
pub use errors::{AppError, ErrorCode, AppResult};
pub use extract::{AppJson, AppQuery};
pub use gateway::{AccessGateway, AuthState, JwtGateway};
