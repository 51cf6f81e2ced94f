pub mod directory_handle;
pub mod page_preset;
pub mod url_param;
