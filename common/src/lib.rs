//! Domain types shared between the directory controller and the frontend.

pub mod section;
pub mod facet;
pub mod filter;
pub mod sort;
pub mod item;
pub mod progress;
pub mod query_state;
pub mod settings;
