use change_desk::{
    config::{database, seed, settings::ViewSettings},
    core::{asset, change_request, database_store::DatabaseStore, seed::seed_records},
    errors::Result,
    view::{calendar::build_calendar, change_management, cmdb::category_tiles},
};
use dotenvy::dotenv;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. View settings
    let settings = ViewSettings::from_env()
        .inspect_err(|e| error!("Invalid view settings: {}", e))?;
    info!(?settings, "Loaded view settings.");

    // 4. Initialize database
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;
    let store = DatabaseStore::new(db);

    // 5. Seed records from the seed file, if there is one
    let seed_path = seed::seed_file_path();
    if Path::new(&seed_path).exists() {
        let config = seed::load_seed(&seed_path)
            .inspect_err(|e| error!("Failed to load seed file {}: {}", seed_path, e))?;
        let report = seed_records(&store, &store, &config)
            .await
            .inspect_err(|e| error!("Failed to seed records: {}", e))?;
        info!(?report, "Seeded records from {}", seed_path);
    } else {
        warn!("Seed file {} not found, skipping seeding.", seed_path);
    }

    // 6. Dashboard overview
    let changes = change_request::list_change_requests(&store).await?;
    let summary = change_management::summarize(&changes);
    info!(
        incoming = summary.incoming,
        in_review = summary.in_review,
        approved = summary.approved,
        completed = summary.completed,
        "Change management summary"
    );
    for recent in change_management::recent_activities(&changes, settings.recent_activity_limit) {
        info!(id = %recent.id, change_type = %recent.change_type, "Recently approved");
    }

    let assets = asset::list_assets(&store).await?;
    for tile in category_tiles(&assets) {
        info!(category = %tile.category, count = tile.count, "CMDB category");
    }

    for day in build_calendar(&changes) {
        let entries: Vec<String> = day
            .entries
            .iter()
            .map(|entry| format!("{} {}", entry.time_label(), entry.id))
            .collect();
        info!(date = %day.date, changes = ?entries, "Change calendar");
    }

    Ok(())
}
