use clap::{Parser, Subcommand};

/// `next-chapter` - safety-first career coach for people rebuilding after a layoff.
#[derive(Parser, Debug)]
#[command(name = "next-chapter")]
#[command(version = "0.1.0")]
#[command(about = "Talk to the Next Chapter coach from the terminal.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one message to the coach
    Chat {
        /// Message text
        message: String,

        /// User id the message belongs to
        #[arg(short, long)]
        user: String,

        /// Display name used to personalize the reply
        #[arg(long)]
        name: Option<String>,

        /// Days since the layoff
        #[arg(long)]
        days_since_layoff: Option<u32>,

        /// Current day of the 30-day plan
        #[arg(long)]
        plan_day: Option<u32>,

        /// Treat the user as a pro subscriber (no daily cap)
        #[arg(long)]
        pro: bool,
    },

    /// Show a user's stored conversation
    History {
        #[arg(short, long)]
        user: String,
    },

    /// Delete a user's stored conversation
    Clear {
        #[arg(short, long)]
        user: String,
    },

    /// Show message and token usage for a user
    Usage {
        #[arg(short, long)]
        user: String,

        /// Window to report (day, week, month)
        #[arg(long, default_value = "day", value_parser = ["day", "week", "month"])]
        period: String,

        #[arg(long)]
        pro: bool,
    },

    /// Classify text without calling the model or touching quota
    Classify {
        /// Text to classify
        text: String,
    },

    /// List the cached fallback responses
    Cached,

    /// Resume review tools
    #[command(subcommand)]
    Resume(ResumeCommands),
}

#[derive(Subcommand, Debug)]
pub enum ResumeCommands {
    /// Score a resume against a target role
    Analyze {
        /// Plain-text resume file
        #[arg(short, long)]
        file: std::path::PathBuf,

        /// Role the resume should target
        #[arg(short, long)]
        role: String,
    },

    /// Rewrite one resume section for a target role
    Rewrite {
        /// Plain-text file containing the section
        #[arg(short, long)]
        file: std::path::PathBuf,

        /// Section name (e.g. "Experience")
        #[arg(short, long)]
        section: String,

        #[arg(short, long)]
        role: String,
    },
}
