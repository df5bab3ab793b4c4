// src/core/mod.rs

pub mod html;
pub mod net;
pub mod sanitize;

pub use html::{Fragment, locate_any, locate_table};
pub use net::{Fetch, HttpFetcher};
