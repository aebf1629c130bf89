use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "facesearch-bot")]
#[command(about = "Telegram bot that looks up faces on a face-search service", long_about = None)]
pub struct Cli {
    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Settings file to use instead of config/default.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of matches per reply (1-10)
    #[arg(long)]
    pub max_results: Option<usize>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "facesearch-bot",
            "--token",
            "123:abc",
            "--max-results",
            "5",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.token.as_deref(), Some("123:abc"));
        assert_eq!(cli.max_results, Some(5));
        assert!(cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_rejects_non_numeric_max_results() {
        assert!(Cli::try_parse_from(["facesearch-bot", "--max-results", "many"]).is_err());
    }
}
