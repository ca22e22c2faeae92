//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sift_core::FilterRequest;
use sift_core::customer::SEARCH_FIELDS;

/// Sift - filtered search and indexing against a document search engine
#[derive(Parser, Debug)]
#[command(name = "sift", version)]
#[command(about = "Compile, run, and index filtered search queries", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SIFT_CONFIG", global = true)]
    pub config: Option<String>,

    /// Engine base URL (overrides the config file)
    #[arg(long, env = "SIFT_URL", global = true)]
    pub url: Option<String>,

    /// Target index (overrides the config file)
    #[arg(long, env = "SIFT_INDEX", global = true)]
    pub index: Option<String>,

    /// Debug-level logging for sift crates
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the compiled query body without contacting the engine
    Compile(QueryArgs),
    /// Compile a query, run it, and print the raw engine response
    Search(QueryArgs),
    /// Upsert one JSON document
    Index {
        /// Document id
        #[arg(long)]
        id: String,
        /// Path to a JSON file holding the document
        #[arg(long)]
        file: PathBuf,
        #[command(flatten)]
        visibility: VisibilityArgs,
    },
    /// Upsert the sample customer records
    Seed {
        #[command(flatten)]
        visibility: VisibilityArgs,
    },
}

/// Write visibility flags shared by `index` and `seed`.
///
/// Neither flag leaves the configured `indexing.immediate_visibility` in
/// effect; the last flag given wins.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct VisibilityArgs {
    /// Make each write searchable before returning
    #[arg(long, overrides_with = "no_immediate")]
    pub immediate: bool,

    /// Let writes become searchable on the engine's own refresh schedule
    #[arg(long, overrides_with = "immediate")]
    pub no_immediate: bool,
}

impl VisibilityArgs {
    /// The visibility requested on the command line, if any.
    pub fn requested(&self) -> Option<bool> {
        match (self.immediate, self.no_immediate) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Filter, search, and pagination flags shared by `compile` and `search`.
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Hits to skip
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub offset: i64,

    /// Page size
    #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
    pub limit: i64,

    /// Exact-match filter as FIELD=VALUE; repeat in the order to apply
    #[arg(short, long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Free-text search term
    #[arg(short, long)]
    pub query: Option<String>,

    /// Fields searched by --query (comma separated; default FirstName,LastName)
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Reject field names outside the customer schema
    #[arg(long)]
    pub strict: bool,
}

impl QueryArgs {
    /// Build the filter request described by the flags.
    pub fn to_request(&self) -> FilterRequest {
        let fields: Vec<String> = if self.fields.is_empty() {
            SEARCH_FIELDS.iter().map(|f| f.to_string()).collect()
        } else {
            self.fields.clone()
        };

        let mut request = self
            .filters
            .iter()
            .fold(FilterRequest::new(self.offset, self.limit), |r, (f, v)| {
                r.filter(f.as_str(), v.as_str())
            })
            .search_fields(fields);
        if let Some(ref text) = self.query {
            request = request.query(text.as_str());
        }
        request
    }
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((field, value)) if !field.is_empty() => Ok((field.to_string(), value.to_string())),
        _ => Err(format!("expected FIELD=VALUE, got '{raw}'")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter("City=New York").unwrap(),
            ("City".to_string(), "New York".to_string())
        );
        assert_eq!(
            parse_filter("Email=").unwrap(),
            ("Email".to_string(), String::new())
        );
        assert!(parse_filter("City").is_err());
        assert!(parse_filter("=x").is_err());
    }

    #[test]
    fn test_search_flags_to_request() {
        let cli = Cli::try_parse_from([
            "sift",
            "search",
            "--offset",
            "20",
            "--limit",
            "5",
            "-f",
            "FirstName=John",
            "--filter",
            "City=New York",
            "--query",
            "jo",
        ])
        .unwrap();

        let Command::Search(args) = cli.command else {
            unreachable!("Expected search command");
        };
        let request = args.to_request();
        assert_eq!(request.offset, 20);
        assert_eq!(request.limit, 5);
        assert_eq!(request.field_filters[0].field, "FirstName");
        assert_eq!(request.field_filters[1].value, "New York");
        assert_eq!(request.free_text_query.as_deref(), Some("jo"));
        assert_eq!(request.free_text_fields, vec!["FirstName", "LastName"]);
    }

    #[test]
    fn test_visibility_flags() {
        let requested = |argv: &[&str]| {
            let cli = Cli::try_parse_from(argv).unwrap();
            let Command::Seed { visibility } = cli.command else {
                unreachable!("Expected seed command");
            };
            visibility.requested()
        };

        assert_eq!(requested(&["sift", "seed"]), None);
        assert_eq!(requested(&["sift", "seed", "--immediate"]), Some(true));
        assert_eq!(requested(&["sift", "seed", "--no-immediate"]), Some(false));
        assert_eq!(
            requested(&["sift", "seed", "--immediate", "--no-immediate"]),
            Some(false)
        );
        assert_eq!(
            requested(&["sift", "seed", "--no-immediate", "--immediate"]),
            Some(true)
        );
    }

    #[test]
    fn test_explicit_fields_and_negative_limit() {
        let cli = Cli::try_parse_from([
            "sift", "compile", "--limit", "-1", "--fields", "Email,City",
        ])
        .unwrap();

        let Command::Compile(args) = cli.command else {
            unreachable!("Expected compile command");
        };
        let request = args.to_request();
        assert_eq!(request.limit, -1);
        assert_eq!(request.free_text_fields, vec!["Email", "City"]);
    }
}
