pub mod search;
pub mod session_service;
pub mod species_service;
