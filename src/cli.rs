//! CLI domain: parse, route and output only.
//! Browsing itself lives in the session and the terminal front-end.

mod output;
mod parse;
mod route;

pub use output::{map_error, map_open_error};
pub use parse::Cli;
pub use route::RunContext;
