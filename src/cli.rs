//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; the route table dispatches to the query service.

mod fixture;
mod output;
mod parse;
mod presentation;
mod route;

pub use fixture::{ImportSummary, StoreSnapshot};
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{format_import_summary, format_versions_json, format_versions_text};
pub use route::RunContext;
