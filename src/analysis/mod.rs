pub mod dto;
pub mod handlers;
pub mod parser;
mod prompt;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
