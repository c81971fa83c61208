pub mod api_handlers;
pub mod auth_handlers;
pub mod health_handlers;
pub mod session_gate;
pub mod species_handlers;
