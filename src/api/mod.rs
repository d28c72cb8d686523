pub mod links;
pub mod redirect;

pub use links::LinksService;
pub use redirect::RedirectService;
