pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Add, All, Delete, Get, Keygen, Serve, Types, Update, Version};
