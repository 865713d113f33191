mod validator;

pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use services::AuthService;
pub use validator::JwtValidator;
