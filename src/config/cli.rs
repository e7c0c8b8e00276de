use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "myth-relay")]
#[command(about = "Check a claim against the Gemini API and print the verdict as JSON")]
pub struct CliArgs {
    /// The claim to verify
    pub query: String,

    /// Path to a TOML configuration file with a [gemini] table
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the Gemini model variant
    #[arg(long)]
    pub model: Option<String>,

    /// Pretty-print the verdict
    #[arg(long)]
    pub pretty: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
