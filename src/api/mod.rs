pub mod auth;
pub mod library;
pub mod middleware;
pub mod radio;
pub mod users;

pub use auth::auth_routes;
pub use library::library_routes;
pub use radio::radio_routes;
pub use users::user_routes;
