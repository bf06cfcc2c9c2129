//! I/O collaborators: SearchAPI queries, product downloads, and sessions

pub mod download;
pub mod search;
pub mod session;

pub use download::{download_product, download_stack, download_url};
pub use search::SearchClient;
pub use session::Session;
