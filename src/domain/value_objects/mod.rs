pub mod record_status;

pub use record_status::*;
