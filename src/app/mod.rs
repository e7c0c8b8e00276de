pub mod endpoint;

pub use endpoint::{route, HttpEvent, HttpResponse};
