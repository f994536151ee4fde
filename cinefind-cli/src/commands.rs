//! CLI command implementations

use anyhow::Context;
use clap::Subcommand;
use cinefind_core::{CinefindConfig, JsonFileStore, MovieRecord, MovieStore, StoredMovie, UNKNOWN};
use cinefind_search::{MovieSearchError, MovieSearchService};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Paginated title search, as the remote service ranks it
    Search {
        /// Title or part of a title
        query: String,
        /// Number of pages to load
        #[arg(short, long, default_value = "1")]
        pages: u32,
    },
    /// Tolerant search for partial or misspelled titles
    Find {
        /// Title as remembered
        query: String,
    },
    /// Show full details for one movie from the remote service
    Detail {
        /// IMDb identifier, e.g. tt0068646
        imdb_id: String,
    },
    /// Fetch a movie and save it locally
    Save {
        /// IMDb identifier
        imdb_id: String,
    },
    /// Show a saved movie
    Show {
        /// IMDb identifier
        imdb_id: String,
    },
    /// List saved movies featuring an actor
    Actor {
        /// Full or partial actor name
        name: String,
    },
    /// List all saved movies
    List,
}

/// Handle the CLI command
///
/// # Errors
/// Returns configuration, network setup or storage failures
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    let config = CinefindConfig::from_env();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let store = JsonFileStore::new(&config.storage.records_path);

    match command {
        Commands::Search { query, pages } => search(&config, &query, pages).await,
        Commands::Find { query } => find(&config, &query).await,
        Commands::Detail { imdb_id } => detail(&config, &imdb_id).await,
        Commands::Save { imdb_id } => save(&config, &store, &imdb_id).await,
        Commands::Show { imdb_id } => show(&store, &imdb_id).await,
        Commands::Actor { name } => actor(&store, &name).await,
        Commands::List => list(&store).await,
    }
}

fn service(config: &CinefindConfig) -> anyhow::Result<MovieSearchService> {
    if config.api.api_key.is_none() {
        tracing::warn!("No API key configured; set OMDB_API_KEY or CINEFIND_API_KEY");
    }
    MovieSearchService::new(config).context("could not set up the movie service")
}

async fn search(config: &CinefindConfig, query: &str, pages: u32) -> anyhow::Result<()> {
    let service = service(config)?;

    let first = match service.new_search(query).await {
        Ok(first) => first,
        Err(MovieSearchError::EmptyQuery) => {
            println!("{}", MovieSearchError::EmptyQuery);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if first.items.is_empty() {
        println!("No movies found matching: {}", query.trim());
        return Ok(());
    }

    for _ in 1..pages.max(1) {
        match service.load_more().await {
            Ok(_) => {}
            Err(MovieSearchError::NoMorePages { .. }) => break,
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(session) = service.session().await {
        println!(
            "Showing {} of {} results for '{}'",
            session.items().len(),
            session.total_results(),
            session.query()
        );
        println!("{:-<60}", "");
        print_rows(session.items());
    }

    Ok(())
}

async fn find(config: &CinefindConfig, query: &str) -> anyhow::Result<()> {
    let report = service(config)?.search_with_fallback(query).await;

    if !report.is_success() {
        println!("{}", report.error_message);
        return Ok(());
    }

    let strategies: Vec<String> = report.attempts.iter().map(ToString::to_string).collect();
    println!(
        "Found {} movies (tried: {})",
        report.results.len(),
        strategies.join(" -> ")
    );
    println!("{:-<60}", "");
    print_rows(&report.results);

    Ok(())
}

async fn detail(config: &CinefindConfig, imdb_id: &str) -> anyhow::Result<()> {
    let outcome = service(config)?.fetch_detail(imdb_id.trim()).await;

    if outcome.is_absorbed() {
        println!("Could not load details for {}", imdb_id.trim());
        return Ok(());
    }
    print_record(outcome.value());

    Ok(())
}

async fn save(config: &CinefindConfig, store: &JsonFileStore, imdb_id: &str) -> anyhow::Result<()> {
    match service(config)?.save_movie(imdb_id, store).await {
        Ok(stored) => {
            println!(
                "Saved {} ({}) to {}",
                stored.record.title,
                stored.record.imdb_id,
                store.path().display()
            );
            Ok(())
        }
        Err(MovieSearchError::Storage(e)) => {
            println!("Movie not saved: {e}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn show(store: &JsonFileStore, imdb_id: &str) -> anyhow::Result<()> {
    match store.get(imdb_id.trim()).await? {
        Some(stored) => {
            print_record(&stored.record);
            println!("Saved:     {}", stored.saved_at.format("%Y-%m-%d %H:%M UTC"));
        }
        None => println!("No saved movie with id {}", imdb_id.trim()),
    }
    Ok(())
}

async fn actor(store: &JsonFileStore, name: &str) -> anyhow::Result<()> {
    let matches = store.find_by_actor(name).await?;
    if matches.is_empty() {
        println!("No saved movies featuring '{}'", name.trim());
        return Ok(());
    }
    print_stored(&matches);
    Ok(())
}

async fn list(store: &JsonFileStore) -> anyhow::Result<()> {
    let all = store.list().await?;
    if all.is_empty() {
        println!("No saved movies yet.");
        println!("Use 'cinefind save <imdb-id>' to keep one.");
        return Ok(());
    }
    print_stored(&all);
    Ok(())
}

fn print_rows(records: &[MovieRecord]) {
    for record in records {
        println!(
            "{:<11} {:<6} {:>4}  {}",
            record.imdb_id,
            record.year,
            rating_cell(record),
            record.title
        );
    }
}

fn rating_cell(record: &MovieRecord) -> String {
    record
        .rating()
        .map_or_else(|| "-".to_string(), |rating| format!("{rating:.1}"))
}

fn print_stored(stored: &[StoredMovie]) {
    let records: Vec<MovieRecord> = stored.iter().map(|s| s.record.clone()).collect();
    print_rows(&records);
}

fn or_unknown(value: &str) -> &str {
    if value.is_empty() { UNKNOWN } else { value }
}

fn print_record(record: &MovieRecord) {
    println!("{} ({})", record.title, record.year);
    println!("{:-<60}", "");
    println!("IMDb:      {}", record.imdb_id);
    println!("Rated:     {}", record.rated);
    println!("Released:  {}", record.released);
    println!("Runtime:   {}", record.runtime);
    println!("Genre:     {}", or_unknown(&record.genres().join(" / ")));
    println!("Director:  {}", record.director);
    println!("Writer:    {}", record.writer);
    println!("Cast:      {}", or_unknown(&record.cast().join(", ")));
    match record.rating() {
        Some(rating) => println!("Rating:    {rating:.1}/10"),
        None => println!("Rating:    {}", record.imdb_rating),
    }
    println!("Type:      {}", record.media_type);
    println!("Poster:    {}", record.poster);
    println!();
    println!("{}", record.plot);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_cell_uses_numeric_rating() {
        let mut record = MovieRecord::unknown("tt0068646");
        assert_eq!(rating_cell(&record), "-");

        record.imdb_rating = "9.2".to_string();
        assert_eq!(rating_cell(&record), "9.2");

        record.imdb_rating = "N/A".to_string();
        assert_eq!(rating_cell(&record), "-");
    }

    #[test]
    fn test_empty_lists_render_as_unknown() {
        let record = MovieRecord::unknown("tt0068646");
        assert_eq!(or_unknown(&record.genres().join(" / ")), UNKNOWN);
        assert_eq!(or_unknown("Crime / Drama"), "Crime / Drama");
    }
}
