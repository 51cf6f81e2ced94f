//! Server-side entry points wrapped by the frontend's server functions.

mod prerender_first_page;
pub use prerender_first_page::{PrerenderedPage, prerender_first_page};
