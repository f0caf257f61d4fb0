use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "resource-etl")]
#[command(about = "Import directory spreadsheets into the resource database")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "import-config.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Fetch and map every source but skip the inserts
    #[arg(long)]
    pub dry_run: bool,

    /// Override backend.batch_size from the config file
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Only run the named sources
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
}

impl CliArgs {
    pub fn selects(&self, source_name: &str) -> bool {
        self.only.is_empty() || self.only.iter().any(|name| name == source_name)
    }

    /// `--only` names that match none of the given sources.
    pub fn unmatched_only<'a>(&'a self, source_names: &[&str]) -> Vec<&'a str> {
        self.only
            .iter()
            .map(String::as_str)
            .filter(|name| !source_names.contains(name))
            .collect()
    }
}
