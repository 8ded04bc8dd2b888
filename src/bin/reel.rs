//! reel: reelsearch terminal client.
//!
//! Runs searches through the session cache and prints results as soon as
//! they arrive, followed by the AI summary.

use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use reelsearch::cache::SessionCache;
use reelsearch::config::Config;
use reelsearch::orchestrator::{SearchOrchestrator, SearchOutcome, SearchView};
use reelsearch::search::movie_by_id;
use reelsearch::{Movie, SearchFilters, SearchMode, SearchParams};

/// reelsearch terminal client
#[derive(Parser)]
#[command(name = "reel")]
#[command(version)]
#[command(about = "Search movies from the terminal")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search for movies and summarize the results
    Search {
        /// Search text
        query: Option<String>,
        /// Number of results
        #[arg(short, long, default_value_t = 10)]
        size: usize,
        /// Earliest release year
        #[arg(long)]
        year_min: Option<i32>,
        /// Latest release year
        #[arg(long)]
        year_max: Option<i32>,
        /// Minimum average rating
        #[arg(long)]
        rating_min: Option<f64>,
        /// Genre filter (repeatable)
        #[arg(short, long = "genre")]
        genres: Vec<String>,
        /// Search mode
        #[arg(short, long, value_enum, default_value_t = Mode::Semantic)]
        mode: Mode,
        /// Full parameter document as JSON (overrides the other options)
        #[arg(long)]
        params: Option<String>,
        /// Skip the session cache
        #[arg(long)]
        no_cache: bool,
    },

    /// Show a single movie
    Movie {
        /// Movie id
        id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Keyword,
    Semantic,
    Hybrid,
}

impl From<Mode> for SearchMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Keyword => SearchMode::Keyword,
            Mode::Semantic => SearchMode::Semantic,
            Mode::Hybrid => SearchMode::Hybrid,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    let backend = Arc::new(config.http_backend()?);

    match args.command {
        Command::Search {
            query,
            size,
            year_min,
            year_max,
            rating_min,
            genres,
            mode,
            params,
            no_cache,
        } => {
            let params = match params {
                Some(json) => SearchParams::parse_or_empty(&json),
                None => {
                    let mut filters = SearchFilters::new().genres(genres);
                    filters.year.min = year_min;
                    filters.year.max = year_max;
                    filters.rating.min = rating_min;
                    SearchParams::new(query.unwrap_or_default())
                        .size(size)
                        .filters(filters)
                        .mode(mode.into())
                }
            };

            let cache = if no_cache {
                SessionCache::disabled()
            } else {
                config.session_cache()
            };
            let orchestrator = SearchOrchestrator::new(backend, cache);

            match orchestrator.search(params).await {
                SearchOutcome::Idle => {
                    eprintln!("Nothing to search for.");
                }
                SearchOutcome::Fetched(task) => {
                    print_movies(&orchestrator.view());
                    println!("Summarizing...");
                    task.wait().await;
                    print_summary(&orchestrator.view());
                }
                SearchOutcome::Cached | SearchOutcome::NoResults | SearchOutcome::Superseded => {
                    let view = orchestrator.view();
                    print_movies(&view);
                    print_summary(&view);
                }
            }
        }

        Command::Movie { id } => match movie_by_id(backend.as_ref(), &id).await {
            Some(movie) => print_movie_details(&movie),
            None => {
                eprintln!("Movie {id} not found.");
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

fn print_movies(view: &SearchView) {
    if view.movies.is_empty() {
        println!("No movies found for \"{}\".", view.query);
        return;
    }
    let source = if view.from_cache { " (cached)" } else { "" };
    println!("Results for \"{}\"{source}:", view.query);
    for (i, movie) in view.movies.iter().enumerate() {
        println!("{:>3}. {}", i + 1, movie_line(movie));
    }
    println!();
}

fn print_summary(view: &SearchView) {
    if !view.summary.is_empty() {
        println!("{}", view.summary);
    }
}

fn movie_line(movie: &Movie) -> String {
    let mut line = movie.title.clone();
    if let Some(year) = movie.release_year() {
        line.push_str(&format!(" ({year})"));
    }
    if let Some(rating) = movie.vote_average {
        line.push_str(&format!("  ★ {rating:.1}"));
    }
    let genres = movie.genre_list();
    if !genres.is_empty() {
        line.push_str(&format!("  [{}]", genres.join(", ")));
    }
    line
}

fn print_movie_details(movie: &Movie) {
    println!("{}", movie_line(movie));
    if let Some(tagline) = movie.tagline.as_deref().filter(|t| !t.is_empty()) {
        println!("  \"{tagline}\"");
    }
    if let Some(director) = &movie.director {
        println!("  Director: {director}");
    }
    let cast = movie.cast_list();
    if !cast.is_empty() {
        println!("  Cast: {}", cast.join(", "));
    }
    if let Some(runtime) = movie.runtime {
        println!("  Runtime: {runtime} min");
    }
    if let Some(overview) = &movie.overview {
        println!();
        println!("{overview}");
    }
}
