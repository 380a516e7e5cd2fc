pub mod action_log;
pub mod backend;
pub mod bridge;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod error;
pub mod formatter;
pub mod input;
pub mod popup;
pub mod recorder;
pub mod session;
pub mod storage;
pub mod synthesizer;

pub use reel_common as model;
pub use reel_scanner as scanner;
