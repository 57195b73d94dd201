//! CLI domain: parse, route and output only.
//! The digest pipeline itself lives in `tree`.

mod output;
mod parse;
mod route;

pub use output::{map_error, render_tree_view};
pub use parse::Cli;
pub use route::RunContext;
