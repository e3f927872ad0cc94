//! Example: Generate candidates for a user
//!
//! Run with: cargo run --package sources --example generate_candidates [data_dir] [user_id]
//!
//! This example shows how to:
//! 1. Load the dataset
//! 2. Read the user's rating history
//! 3. Score genres by affinity
//! 4. Build the per-genre candidate pool
//! 5. Build the shot pool

use data_loader::{DataIndex, MovieFilter, MovieStore};
use sources::{GenreAffinity, GenrePoolBuilder, RatingHistory, ShotPoolBuilder};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let mut args = std::env::args().skip(1);
    let data_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/sample"));
    let user_id: u32 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(1);

    println!("=== Candidate Generation Example ===\n");

    let start = Instant::now();
    let store: Arc<dyn MovieStore> = Arc::new(DataIndex::load_from_files(&data_dir)?);
    println!("Loaded dataset in {:?}\n", start.elapsed());

    let history = RatingHistory::load(store.as_ref(), user_id)?;
    println!("User {} ({})", user_id, history.user.username);
    println!("  Ratings: {}\n", history.len());

    let affinity = GenreAffinity::compute(&history, &store.query_genres()?);
    println!("Genre affinity:");
    for score in affinity.top(5) {
        println!("  {:<18} {}", score.genre.name, score.score);
    }

    let base = MovieFilter::complete_metadata().with_min_vote_count(50);
    let start = Instant::now();
    let pool = GenrePoolBuilder::new(store.clone()).build(&base, &affinity.top_ids(3), 12)?;
    println!("\nGenre pool ({} candidates, {:?}):", pool.len(), start.elapsed());
    for candidate in &pool {
        println!("  {:<24} {:?}", candidate.movie.title, candidate.source);
    }

    let shots = ShotPoolBuilder::new(store).build(&MovieFilter::complete_metadata(), 12)?;
    println!("\nShot pool ({} candidates):", shots.len());
    for candidate in &shots {
        println!(
            "  {:<24} {} shots",
            candidate.movie.title,
            candidate.shot_count.unwrap_or(0)
        );
    }

    Ok(())
}
