pub mod dto;
mod leads;
pub mod response;
mod router;
pub mod validation;

pub use leads::lead_router;
pub use router::{AppState, create_router};
