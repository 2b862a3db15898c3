#![forbid(unsafe_code)]

pub mod build;
pub mod cli;
pub mod derive;
pub mod engine;
pub mod formats;
pub mod index;
pub mod load;
pub mod logging;
pub mod offline;
pub mod render;
pub mod serve;
pub mod validate;
pub mod widgets;
