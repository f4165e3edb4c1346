pub mod follows;
pub mod tweets;
pub mod users;
