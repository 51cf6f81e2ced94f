pub mod directory_api;
