mod batch_request;
pub use batch_request::{BatchOutcome, fetch_all};
