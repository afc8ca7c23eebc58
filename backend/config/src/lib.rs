pub mod env;
pub mod schema;
pub mod validation;

pub use env::load;
pub use schema::BotConfig;
pub use validation::{validate, ConfigValidationError, ValidationReport};
