pub mod directory_page;
pub mod home_page;
