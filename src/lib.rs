pub mod config;
pub mod countdown;
pub mod export;
pub mod feed;
pub mod fields;
pub mod form;
pub mod gym_api;
pub mod http_client;
pub mod match_api;
pub mod player_api;
pub mod session;
pub mod sport_api;
pub mod state;
pub mod submit;
pub mod sync;
pub mod wire;
