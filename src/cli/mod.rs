mod menu;
mod root;

pub use root::Cli;
