pub mod auth;
pub mod dj;
pub mod library;
pub mod player;
pub mod playlist;
pub mod radio_manager;
pub mod vetoes;

pub use auth::AuthService;
pub use dj::Dj;
pub use library::Library;
pub use radio_manager::RadioManager;
