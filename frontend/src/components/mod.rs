pub mod directory_components;
pub mod error_boundary;
pub mod suspend_boundary;
