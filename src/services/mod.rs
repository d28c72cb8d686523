pub mod link_service;

pub use link_service::{CreatedLink, ShortLinkService};
