use data_loader::DataIndex;
use std::path::PathBuf;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/sample"));

    println!("Loading movie dataset from {}...\n", data_dir.display());

    let start = Instant::now();
    let index = DataIndex::load_from_files(&data_dir)?;
    let elapsed = start.elapsed();

    let (users, movies, ratings, shots) = index.counts();

    println!("=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Genres:  {}", index.genres().len());
    println!("Movies:  {}", movies);
    println!("Users:   {}", users);
    println!("Ratings: {}", ratings);
    println!("Shots:   {}", shots);
    println!(
        "\nPerformance: {:.0} records/second",
        (movies + ratings + shots) as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}
