//! CLI argument parsing for the avatar fetch pass.
//!
//! Every flag has a default so a bare invocation from the site repository
//! root performs the whole pass.
use clap::Parser;
use std::path::PathBuf;

/// Quotes collection root, relative to the site repository root.
pub const DEFAULT_QUOTES_ROOT: &str = "content/quotes";

/// Wikipedia REST API base used for page summaries.
pub const DEFAULT_API_BASE: &str = "https://en.wikipedia.org/api/rest_v1";

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "quote-avatars",
    version,
    about = "Fetch missing author avatars for the quotes collection from Wikipedia",
    after_help = "Environment:\n  QUOTE_AVATAR_CONVERT_COMMAND  Converter argv as JSON ({\"command\": [...]}) or a shell-style string.\n                                Placeholders: {input} {output} {size}\n  RUST_LOG                      Overrides the log filter\n\nExamples:\n  quote-avatars\n  quote-avatars --root content/quotes --verbose"
)]
pub struct RootArgs {
    /// Quotes root containing one directory per author
    #[arg(long, value_name = "DIR", default_value = DEFAULT_QUOTES_ROOT)]
    pub root: PathBuf,

    /// Base URL of the Wikipedia REST API
    #[arg(long, value_name = "URL", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Emit debug logs on stderr
    #[arg(long)]
    pub verbose: bool,
}
