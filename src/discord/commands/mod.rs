mod help;
mod mitspieler;

pub use help::commands;
pub use mitspieler::mitspieler;
