use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing
    #[arg(long, global = true, ignore_case = true, default_value = "info")]
    pub trace: TraceLevel,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer an API path the way the agent would see it, e.g. `call /sector_detail sector=energy`.
    Call {
        api_path: String,

        /// Query parameters as `key=value`
        #[arg(value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },

    /// Fetch one table from any page and print it as records.
    Table {
        url: String,

        /// Position of the table on the page
        #[arg(long, default_value_t = 0)]
        index: usize,

        /// Keep the page's own headers and price cells
        #[arg(long)]
        raw: bool,
    },

    /// List every API path that `call` understands.
    Boards,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceLevel {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

pub fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected `key=value`, got `{raw}`"))?;
    if key.is_empty() {
        return Err(format!("missing key in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}
