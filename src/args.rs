use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::PlatformSelector;

/// StorePulse - collect Google Play and App Store reviews into a JSON artifact
#[derive(Parser, Debug)]
#[command(name = "storepulse", version)]
#[command(about = "Fetch and filter app store reviews from Google Play and the App Store")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file to use instead of ~/.config/storepulse/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search both stores for an app and print its ids
    Search {
        /// Search term; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,
    },
    /// Fetch reviews for an app and write them to a JSON file
    Fetch {
        /// Google Play app id, e.g. com.example.app
        android_app_id: String,
        /// App Store id (numeric or bundle id)
        #[arg(long)]
        ios: Option<String>,
        /// Reviews per platform [default: 500]
        #[arg(long)]
        num: Option<usize>,
        /// Max star rating to include [default: 5]
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: Option<u8>,
        /// Only include reviews from the last N months, 0 for all [default: 0]
        #[arg(long)]
        months: Option<u32>,
        /// android, ios or both [default: both]
        #[arg(long)]
        platform: Option<PlatformSelector>,
        /// Country code for the App Store [default: us]
        #[arg(long)]
        country: Option<String>,
        /// Output file [default: reviews_<appname>.json]
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_takes_multiple_words() {
        let args = Args::try_parse_from(["storepulse", "search", "habit", "tracker"]).unwrap();
        match args.command {
            Command::Search { term } => assert_eq!(term.join(" "), "habit tracker"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_search_requires_a_term() {
        assert!(Args::try_parse_from(["storepulse", "search"]).is_err());
    }

    #[test]
    fn test_fetch_flags() {
        let args = Args::try_parse_from([
            "storepulse",
            "fetch",
            "com.example.app",
            "--ios",
            "123456789",
            "--rating",
            "3",
            "--months",
            "6",
            "--platform",
            "IOS",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.verbose, 2);
        match args.command {
            Command::Fetch { android_app_id, ios, num, rating, months, platform, .. } => {
                assert_eq!(android_app_id, "com.example.app");
                assert_eq!(ios.as_deref(), Some("123456789"));
                assert_eq!(num, None);
                assert_eq!(rating, Some(3));
                assert_eq!(months, Some(6));
                assert_eq!(platform, Some(PlatformSelector::Ios));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_fetch_rejects_out_of_range_rating() {
        assert!(Args::try_parse_from(["storepulse", "fetch", "com.x", "--rating", "6"]).is_err());
    }
}
