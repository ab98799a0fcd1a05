//! Command handlers
//!
//! Each handler validates one or two slot values, performs exactly one
//! external call or one settings mutation, and returns a
//! [`CommandResponse`](crate::response::CommandResponse). No handler retries
//! a failed call; external failures are logged by kind and collapsed to a
//! user-facing apology string.

pub mod behavior;
pub mod chat;
pub mod password;
pub mod translate;
pub mod weather;
pub mod web;

pub use behavior::BotBehavior;
pub use chat::ChatClient;
pub use translate::Translator;
pub use weather::WeatherClient;
pub use web::WebSearcher;
