pub mod detail;
pub mod fav;
pub mod list;
