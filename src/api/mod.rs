pub mod payload;
pub mod token;

pub use payload::{IntoPayload, NewToken, TokenQuery, TokenRef, TokenStatus, TokenStatusUpdate};
pub use token::TokenApiClient;
