//! Page objects for the Book Store application.

pub mod book_store;
pub mod login;
pub mod profile;

pub use book_store::{BookStorePage, IsbnCheck};
pub use login::LoginPage;
pub use profile::ProfilePage;
