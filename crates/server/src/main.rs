//! Simple test harness for the recommendation service.
//!
//! Loads a dataset, then prints the personalized list for one user and the
//! shot-affinity list as JSON.
//!
//! Usage: server [data_dir] [user_id]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use data_loader::DataIndex;
use pipeline::RecommendConfig;
use server::RecommendationService;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info,server=debug,sources=debug,pipeline=debug")
        .init();

    let mut args = std::env::args().skip(1);
    let data_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/sample"));
    let user_id: u32 = match args.next() {
        Some(raw) => raw.parse().context("user_id must be a number")?,
        None => 1,
    };

    info!("Starting recommendation service test harness");

    info!("Loading data index from {}...", data_dir.display());
    let data_index = DataIndex::load_from_files(&data_dir)
        .with_context(|| format!("Failed to load dataset from {}", data_dir.display()))?;
    let service = RecommendationService::new(Arc::new(data_index), RecommendConfig::default());
    info!("Data index loaded successfully");

    info!("Getting recommendations for user {}", user_id);
    let personalized = service.recommend_for_user(user_id).await?;
    println!("{}", serde_json::to_string_pretty(&personalized)?);

    info!("Getting shot-affinity recommendations");
    let shots = service.recommend_by_shot_affinity().await?;
    println!("{}", serde_json::to_string_pretty(&shots)?);

    Ok(())
}
