mod bot;
pub mod commands;

pub use bot::{Data, create_framework};
