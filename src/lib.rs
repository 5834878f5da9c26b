pub mod config;
pub mod errors;
pub mod host;
pub mod reslens;
pub mod resolution;
pub mod scanner;
pub mod sources;
pub mod store;
pub mod tree;
pub mod types;
