use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use commands::{clear, config, reviews, seed, translate};
use review_config::PathManager;
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "moviereviews")]
#[command(about = "Movie reviews with cached on-demand translation")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load seed reviews into the store
    #[command(long_about = "Load review records from a JSON array or a CSV file (header: movieId,reviewerName,reviewDate,rating,content). Reviews that already exist are left untouched, so seeding twice is harmless. Without FILE the configured seed file is used, then seed/reviews.json.")]
    Seed {
        /// Seed file (.json or .csv)
        file: Option<PathBuf>,
    },
    /// Query and modify reviews
    Reviews {
        #[command(subcommand)]
        cmd: ReviewCommands,
    },
    /// Translate a review into another language
    #[command(long_about = "Translate one review through the configured provider. Results are cached per review version, so repeated requests are served locally until the review is edited.")]
    Translate {
        movie_id: i64,
        reviewer: String,
        /// Target language code (e.g. fr, de, pt-BR)
        language: String,
    },
    /// Show or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
    /// Delete stored reviews and/or cached translations
    #[command(long_about = "Delete snapshot files. Use --reviews to drop the review store (cached translations go with it), --translations to drop cached translations, or --all for both.")]
    Clear {
        /// Clear reviews and translations
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,

        /// Clear the review store and its cached translations
        #[arg(long, action = ArgAction::SetTrue)]
        reviews: bool,

        /// Clear cached translations
        #[arg(long, action = ArgAction::SetTrue)]
        translations: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderBy {
    Reviewer,
    Date,
    Rating,
}

#[derive(Subcommand)]
pub enum ReviewCommands {
    /// List the reviews of a movie
    Movie {
        movie_id: i64,

        /// Ordering of the listing
        #[arg(long, value_enum, default_value = "reviewer")]
        order_by: OrderBy,

        /// Reverse the ordering
        #[arg(long, action = ArgAction::SetTrue)]
        desc: bool,

        /// Only reviews dated after this day (YYYY-MM-DD)
        #[arg(long, conflicts_with_all = ["min_rating", "year"])]
        since: Option<NaiveDate>,

        /// Only reviews rated at least this (1-10)
        #[arg(long, conflicts_with = "year")]
        min_rating: Option<u8>,

        /// Only reviews written in this year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Show one review
    Get { movie_id: i64, reviewer: String },
    /// List every review written by a reviewer
    ByReviewer { reviewer: String },
    /// Create a review, or replace yours with a new version
    Submit {
        movie_id: i64,
        reviewer: String,

        #[arg(long)]
        rating: u8,

        #[arg(long)]
        content: String,

        /// Review date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Change fields of an existing review
    Edit {
        movie_id: i64,
        reviewer: String,

        #[arg(long)]
        rating: Option<u8>,

        #[arg(long)]
        content: Option<String>,

        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete a review and its cached translations
    Remove { movie_id: i64, reviewer: String },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,

        /// Translation provider
        #[arg(long, value_enum)]
        provider: Option<config::ProviderArg>,

        /// Provider base URL
        #[arg(long)]
        endpoint: Option<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let paths = PathManager::default();

    // Logging needs the config for its optional log file
    let app_config = commands::load_config(&paths)?;
    logging::init_logging(cli.verbose, cli.quiet, app_config.logging.file.clone())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Seed { file } => seed::run_seed(file, &app_config, &paths, &output).await,
        Commands::Reviews { cmd } => reviews::run_reviews(cmd, &app_config, &paths, &output).await,
        Commands::Translate {
            movie_id,
            reviewer,
            language,
        } => translate::run_translate(movie_id, &reviewer, &language, &app_config, &paths, &output).await,
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            config::run_config(cmd, &paths, &output)
        }
        Commands::Clear {
            all,
            reviews,
            translations,
        } => clear::run_clear(all, reviews, translations, &paths, &output),
    }
}
