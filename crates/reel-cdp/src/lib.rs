pub mod backend;
pub mod cdp;
pub mod eval;

pub use backend::CdpBackend;
