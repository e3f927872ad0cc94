use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{DataIndex, MovieId, UserId};
use pipeline::{MovieSummary, RecommendConfig};
use rand::seq::IndexedRandom;
use serde::Serialize;
use server::{MoviePage, RecommendationService, ShotPage};
use sources::{CandidateSource, GenreAffinity, RatingHistory};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::debug;

/// cinepick - movie discovery recommendations
#[derive(Parser)]
#[command(name = "cinepick")]
#[command(about = "Genre-affinity and shot-affinity movie recommendations", long_about = None)]
struct Cli {
    /// Path to the JSON dataset directory
    #[arg(short, long, default_value = "data/sample")]
    data_dir: PathBuf,

    /// JSON file with recommendation settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reference date (YYYY-MM-DD) instead of the local date
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Override the size of recommendation lists
    #[arg(long)]
    target_size: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Personalized recommendations from the user's genre affinity
    Recommend {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: UserId,

        /// Show where each movie came from
        #[arg(long)]
        explain: bool,

        /// Print the JSON payload instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Movies people post shots about, most-shot first
    Shotest {
        #[arg(long)]
        json: bool,
    },

    /// Show a user's ratings and genre affinity
    User {
        #[arg(long)]
        user_id: UserId,
    },

    /// List the genre catalog
    Genres,

    /// Most popular movies
    Popular {
        #[arg(long, default_value = "0")]
        page: usize,
        #[arg(long)]
        json: bool,
    },

    /// Movies released within 30 days of today, newest first
    NowPlaying {
        #[arg(long, default_value = "0")]
        page: usize,
        #[arg(long)]
        json: bool,
    },

    /// Movies released within 30 days of today, best voted first
    TopRated {
        #[arg(long, default_value = "0")]
        page: usize,
        #[arg(long)]
        json: bool,
    },

    /// One movie with its videos and trailer or poster link
    Movie {
        #[arg(long)]
        movie_id: MovieId,

        /// Show this user's star rating of the movie
        #[arg(long)]
        viewer: Option<UserId>,

        #[arg(long)]
        json: bool,
    },

    /// Shot feed, newest first
    Shots {
        #[arg(long, default_value = "0")]
        page: usize,
        #[arg(long)]
        json: bool,
    },

    /// Random trailer among recent movies
    Trailer {
        #[arg(long)]
        json: bool,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let start = Instant::now();
    let data_index = Arc::new(
        DataIndex::load_from_files(&cli.data_dir)
            .with_context(|| format!("Failed to load dataset from {}", cli.data_dir.display()))?,
    );
    eprintln!(
        "{} Loaded dataset from {} in {:?}",
        "✓".green(),
        cli.data_dir.display(),
        start.elapsed()
    );

    let service = RecommendationService::new(data_index.clone(), config);

    match cli.command {
        Commands::Recommend {
            user_id,
            explain,
            json,
        } => handle_recommend(&service, user_id, explain, json).await?,
        Commands::Shotest { json } => handle_shotest(&service, json).await?,
        Commands::User { user_id } => handle_user(&data_index, user_id)?,
        Commands::Genres => handle_genres(&service)?,
        Commands::Popular { page, json } => {
            print_page("Popular", &service.browser().popular(page)?, page, json)?
        }
        Commands::NowPlaying { page, json } => {
            print_page("Now playing", &service.browser().now_playing(page)?, page, json)?
        }
        Commands::TopRated { page, json } => {
            print_page("Top rated", &service.browser().top_rated(page)?, page, json)?
        }
        Commands::Movie {
            movie_id,
            viewer,
            json,
        } => handle_movie(&service, movie_id, viewer, json)?,
        Commands::Shots { page, json } => {
            print_shots(&service.browser().shots(page)?, page, json)?
        }
        Commands::Trailer { json } => handle_trailer(&service, json)?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(&service, &data_index, requests, concurrent).await?,
    }

    Ok(())
}

/// Defaults, then the config file, then flags
fn load_config(cli: &Cli) -> Result<RecommendConfig> {
    let mut config = match &cli.config {
        Some(path) => RecommendConfig::from_json_file(path)?,
        None => RecommendConfig::default(),
    };
    if let Some(today) = cli.today {
        config = config.with_today(today);
    }
    if let Some(target_size) = cli.target_size {
        config = config.with_target_size(target_size);
    }
    config.validate()?;
    debug!(?config, "Resolved configuration");
    Ok(config)
}

/// Handle the 'recommend' command
async fn handle_recommend(
    service: &RecommendationService,
    user_id: UserId,
    explain: bool,
    json: bool,
) -> Result<()> {
    let result = service.recommend_for_user(user_id).await?;
    if json {
        return print_json(&result);
    }

    let genres = result
        .top_genres
        .iter()
        .map(|g| format!("{} ({})", g.name, g.score))
        .collect::<Vec<_>>()
        .join(", ");
    println!("{}", format!("Recommendations for user {}", user_id).bold().blue());
    println!("{}Top genres: {}", "• ".green(), genres);
    print_movies(&result.movies, explain);
    print_truncated(result.truncated, result.movies.len(), service.config().target_size);
    Ok(())
}

/// Handle the 'shotest' command
async fn handle_shotest(service: &RecommendationService, json: bool) -> Result<()> {
    let result = service.recommend_by_shot_affinity().await?;
    if json {
        return print_json(&result);
    }

    println!("{}", "Most-shot movies".bold().blue());
    print_movies(&result.movies, false);
    print_truncated(result.truncated, result.movies.len(), service.config().target_size);
    Ok(())
}

/// Handle the 'user' command
fn handle_user(data_index: &DataIndex, user_id: UserId) -> Result<()> {
    let history = RatingHistory::load(data_index, user_id)?;
    let affinity = GenreAffinity::compute(&history, data_index.genres());

    println!(
        "{}",
        format!("User {} ({})", user_id, history.user.username).bold().blue()
    );
    println!("{}Number of ratings: {}", "• ".cyan(), history.len());

    let mut rated: Vec<_> = history.ratings.iter().collect();
    rated.sort_by(|a, b| b.stars.cmp(&a.stars));
    println!("Rated movies:");
    for rating in rated {
        if let Some(movie) = data_index.get_movie(rating.movie_id) {
            println!("  - {} ({} stars)", movie.title, rating.stars);
        }
    }

    println!("Genre affinity:");
    for score in affinity.ranked().iter().filter(|s| s.score > 0) {
        println!("  - {}: {}", score.genre.name, score.score);
    }
    if history.is_empty() {
        println!("  (no ratings, catalog order is used)");
    }
    Ok(())
}

/// Handle the 'genres' command
fn handle_genres(service: &RecommendationService) -> Result<()> {
    println!("{}", "Genres".bold().blue());
    for genre in service.browser().genres()? {
        println!("  {:>6}  {}", genre.id, genre.name);
    }
    Ok(())
}

/// Handle the 'movie' command
fn handle_movie(
    service: &RecommendationService,
    movie_id: MovieId,
    viewer: Option<UserId>,
    json: bool,
) -> Result<()> {
    let detail = service.browser().detail(movie_id, viewer)?;
    if json {
        return print_json(&detail);
    }

    let movie = &detail.movie;
    println!("{} ({})", movie.title.bold().blue(), movie.release_date);
    println!(
        "{}{:.1}/10 from {} votes",
        "• ".green(),
        movie.vote_average,
        movie.vote_count
    );
    if let Some(stars) = detail.stars {
        println!("{}Your rating: {} stars", "• ".green(), stars);
    }
    if !movie.overview.is_empty() {
        println!("{}", movie.overview);
    }
    for video in &detail.videos {
        println!("  - {} [{}]", video.name, video.kind);
    }
    println!("{}", detail.url_path.underline());
    Ok(())
}

/// Handle the 'trailer' command
fn handle_trailer(service: &RecommendationService, json: bool) -> Result<()> {
    let trailer = service.browser().trailer(&mut rand::rng())?;
    if json {
        return print_json(&trailer);
    }

    println!(
        "{} ({})",
        trailer.movie.title.bold(),
        trailer.movie.release_date
    );
    println!("{}", trailer.trailer.underline());
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    service: &RecommendationService,
    data_index: &DataIndex,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    let users: Vec<UserId> = data_index.users().map(|u| u.id).collect();
    if users.is_empty() || requests == 0 {
        println!("Nothing to benchmark");
        return Ok(());
    }

    let user_ids: Vec<UserId> = {
        let mut rng = rand::rng();
        (0..requests)
            .filter_map(|_| users.choose(&mut rng).copied())
            .collect()
    };

    let limiter = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall_clock = Instant::now();
    let mut handles = Vec::with_capacity(user_ids.len());
    for user_id in user_ids {
        let service = service.clone();
        let limiter = limiter.clone();
        handles.push(tokio::spawn(async move {
            let _permit = limiter.acquire_owned().await?;
            let start = Instant::now();
            service.recommend_for_user(user_id).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    let mut timings: Vec<Duration> = Vec::with_capacity(handles.len());
    for handle in handles {
        timings.push(handle.await??);
    }
    let total_time = wall_clock.elapsed();

    timings.sort();
    let latency_sum: Duration = timings.iter().sum();
    let avg_latency = latency_sum.div_f64(timings.len() as f64);
    let percentile = |p: f64| {
        let idx = ((timings.len() as f64 * p) as usize).min(timings.len() - 1);
        timings[idx]
    };

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent)", timings.len(), concurrent.max(1));
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!(
        "Throughput: {:.2} requests/second",
        timings.len() as f64 / total_time.as_secs_f64()
    );

    Ok(())
}

fn print_page(label: &str, page: &MoviePage, number: usize, json: bool) -> Result<()> {
    if json {
        return print_json(page);
    }
    println!(
        "{}",
        format!("{} - page {} of {}", label, number, page.max_page)
            .bold()
            .blue()
    );
    if page.movies.is_empty() {
        println!("  (no movies on this page)");
    }
    print_movies(&page.movies, false);
    Ok(())
}

fn print_shots(page: &ShotPage, number: usize, json: bool) -> Result<()> {
    if json {
        return print_json(page);
    }
    println!(
        "{}",
        format!("Shots - page {} of {}", number, page.max_page)
            .bold()
            .blue()
    );
    for shot in &page.shots {
        let movie = shot
            .movie_id
            .map(|id| format!("movie {}", id))
            .unwrap_or_else(|| "no movie".to_string());
        println!(
            "{}. {} ({}) - {} likes",
            shot.id.to_string().green(),
            shot.title,
            movie,
            shot.like_users.len()
        );
    }
    Ok(())
}

/// Print a ranked movie table
fn print_movies(movies: &[MovieSummary], explain: bool) {
    for (i, movie) in movies.iter().enumerate() {
        let genres = movie
            .genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let shots = movie
            .shot_count
            .map(|n| format!(" - {} shots", n))
            .unwrap_or_default();
        println!(
            "{}. {} ({}) [{}] - {:.1}/10{}",
            (i + 1).to_string().green(),
            movie.title,
            movie.release_date,
            genres,
            movie.vote_average,
            shots
        );
        if explain {
            if let Some(source) = movie.source {
                println!("   Source: {}", describe_source(source, movie));
            }
        }
    }
}

fn describe_source(source: CandidateSource, movie: &MovieSummary) -> String {
    match source {
        CandidateSource::Genre(id) => {
            let name = movie
                .genres
                .iter()
                .find(|g| g.id == id)
                .map(|g| g.name.clone())
                .unwrap_or_else(|| id.to_string());
            format!("top genre {}", name)
        }
        CandidateSource::Shot => "posted shots".to_string(),
        CandidateSource::Fallback => "backfill".to_string(),
    }
}

fn print_truncated(truncated: bool, len: usize, target: usize) {
    if truncated {
        println!(
            "{}",
            format!("Only {} of {} movies available", len, target).yellow()
        );
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
