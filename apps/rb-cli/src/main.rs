use clap::{Parser, Subcommand};
use rb_app::{
    AppConfig, AppError, AppResult, Directory, JsonFilePreferences, RouteFilter, RouteForm,
    SIDEBAR_OPEN, SearchCategory, directory, route_service, save_preference, search,
    sidebar_preference,
};
use rb_core::RecordId;
use rb_schema::{
    ActiveDay, Authority, Child, Collection, Driver, Entity, Escort, Institution, Route, RouteType,
};
use rb_store::FileStore;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rb-cli")]
#[command(
    about = "RideBoard CLI - student transport records and route planning",
    long_about = None
)]
struct Cli {
    /// Store directory (overrides config and RIDEBOARD_STORE_DIR)
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the records of a collection, newest first
    List {
        /// children, institutions, authorities, drivers, escorts or routes
        collection: Collection,
    },
    /// Show a child with parents, institutions, authorities and escort
    ShowChild {
        id: String,
    },
    /// Create a record from a JSON or YAML file
    Add {
        collection: Collection,
        file: PathBuf,
    },
    /// Overwrite a record from a JSON or YAML file (matched by its id)
    Update {
        collection: Collection,
        file: PathBuf,
    },
    /// Delete a record by id
    Delete {
        collection: Collection,
        id: String,
    },
    /// Search people and institutions by name prefix
    Search {
        /// Search term (may be empty when a category is given)
        #[arg(default_value = "")]
        term: String,
        /// children, parents, escorts, drivers, supervisors, teachers or institutions
        #[arg(short, long)]
        category: Option<SearchCategory>,
    },
    /// Plan and inspect routes
    #[command(subcommand)]
    Route(RouteCommands),
    /// Export every collection to a dataset file (.yaml or .json)
    Export {
        path: PathBuf,
    },
    /// Import a dataset file, updating records that already exist
    Import {
        path: PathBuf,
    },
    /// Show or toggle the sidebar preference
    Sidebar {
        #[arg(long)]
        toggle: bool,
    },
}

#[derive(Subcommand)]
enum RouteCommands {
    /// Save a route form (JSON or YAML)
    Save {
        form: PathBuf,
        /// Id of the route to overwrite
        #[arg(long)]
        id: Option<String>,
    },
    /// List routes grouped by permanence and time of day
    List {
        /// Case-insensitive name filter
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(long)]
        permanent: Option<bool>,
        /// morning or afternoon
        #[arg(long = "type")]
        route_type: Option<RouteType>,
        /// weekdays or friday
        #[arg(long)]
        day: Option<ActiveDay>,
    },
    /// Print the stops of a route in pickup order
    Sheet {
        id: String,
    },
    /// Report routes whose address snapshots are out of date
    Stale,
    /// Re-derive out-of-date address snapshots of a route
    Refresh {
        id: String,
    },
    /// Delete a route
    Delete {
        id: String,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.config.as_deref(), cli.store.as_deref())?;

    match cli.command {
        Commands::List { collection } => cmd_list(&config, collection),
        Commands::ShowChild { id } => cmd_show_child(&config, &id),
        Commands::Add { collection, file } => cmd_add(&config, collection, &file),
        Commands::Update { collection, file } => cmd_update(&config, collection, &file),
        Commands::Delete { collection, id } => cmd_delete(&config, collection, &id),
        Commands::Search { term, category } => cmd_search(&config, &term, category),
        Commands::Route(route_cmd) => match route_cmd {
            RouteCommands::Save { form, id } => cmd_route_save(&config, &form, id.as_deref()),
            RouteCommands::List {
                search,
                permanent,
                route_type,
                day,
            } => cmd_route_list(
                &config,
                RouteFilter {
                    search,
                    permanent,
                    route_type,
                    day,
                },
            ),
            RouteCommands::Sheet { id } => cmd_route_sheet(&config, &id),
            RouteCommands::Stale => cmd_route_stale(&config),
            RouteCommands::Refresh { id } => cmd_route_refresh(&config, &id),
            RouteCommands::Delete { id } => cmd_route_delete(&config, &id),
        },
        Commands::Export { path } => cmd_export(&config, &path),
        Commands::Import { path } => cmd_import(&config, &path),
        Commands::Sidebar { toggle } => cmd_sidebar(&config, toggle),
    }
}

fn open_store(config: &AppConfig) -> AppResult<FileStore> {
    Ok(FileStore::new(config.store_dir.clone())?)
}

/// Parse a JSON or YAML document, chosen by file extension.
fn read_document<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let content = std::fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::InvalidInput(format!("{}: {}", path.display(), e)))
    } else {
        serde_json::from_str(&content)
            .map_err(|e| AppError::InvalidInput(format!("{}: {}", path.display(), e)))
    }
}

fn cmd_list(config: &AppConfig, collection: Collection) -> AppResult<()> {
    let store = open_store(config)?;
    let rows = directory::list_summaries(&store, collection)?;

    if rows.is_empty() {
        println!("No {} found", collection);
    } else {
        println!("{} ({}):", collection, rows.len());
        for row in rows {
            println!("  {} - {} (created {})", row.id, row.name, row.created_at);
        }
    }
    Ok(())
}

fn cmd_show_child(config: &AppConfig, id: &str) -> AppResult<()> {
    let store = open_store(config)?;
    let directory = Directory::load(&store)?;
    let child = directory
        .child(&RecordId::new(id))
        .ok_or_else(|| AppError::NotFound(format!("child {}", id)))?;

    print!("{}", rb_app::resolve_child_details(child, &directory));
    Ok(())
}

fn add_from_file<T: Entity>(store: &FileStore, file: &Path) -> AppResult<()> {
    let entity: T = read_document(file)?;
    let stored = directory::create_entity(store, entity)?;
    println!("✓ Created {} {}", T::COLLECTION, stored.id());
    Ok(())
}

fn update_from_file<T: Entity>(store: &FileStore, file: &Path) -> AppResult<()> {
    let entity: T = read_document(file)?;
    if entity.id().is_blank() {
        return Err(AppError::InvalidInput(format!(
            "{}: record has no id",
            file.display()
        )));
    }
    let stored = directory::update_entity(store, entity)?;
    println!("✓ Updated {} {}", T::COLLECTION, stored.id());
    Ok(())
}

fn cmd_add(config: &AppConfig, collection: Collection, file: &Path) -> AppResult<()> {
    let store = open_store(config)?;
    match collection {
        Collection::Children => add_from_file::<Child>(&store, file),
        Collection::Institutions => add_from_file::<Institution>(&store, file),
        Collection::Authorities => add_from_file::<Authority>(&store, file),
        Collection::Drivers => add_from_file::<Driver>(&store, file),
        Collection::Escorts => add_from_file::<Escort>(&store, file),
        Collection::Routes => Err(AppError::InvalidInput(
            "routes are created with `route save`".to_string(),
        )),
    }
}

fn cmd_update(config: &AppConfig, collection: Collection, file: &Path) -> AppResult<()> {
    let store = open_store(config)?;
    match collection {
        Collection::Children => update_from_file::<Child>(&store, file),
        Collection::Institutions => update_from_file::<Institution>(&store, file),
        Collection::Authorities => update_from_file::<Authority>(&store, file),
        Collection::Drivers => update_from_file::<Driver>(&store, file),
        Collection::Escorts => update_from_file::<Escort>(&store, file),
        Collection::Routes => Err(AppError::InvalidInput(
            "routes are updated with `route save --id`".to_string(),
        )),
    }
}

fn cmd_delete(config: &AppConfig, collection: Collection, id: &str) -> AppResult<()> {
    let store = open_store(config)?;
    let id = RecordId::new(id);
    match collection {
        Collection::Children => directory::delete_entity::<Child, _>(&store, &id)?,
        Collection::Institutions => directory::delete_entity::<Institution, _>(&store, &id)?,
        Collection::Authorities => directory::delete_entity::<Authority, _>(&store, &id)?,
        Collection::Drivers => directory::delete_entity::<Driver, _>(&store, &id)?,
        Collection::Escorts => directory::delete_entity::<Escort, _>(&store, &id)?,
        Collection::Routes => route_service::delete_route(&store, &id)?,
    }
    println!("✓ Deleted {} {}", collection, id);
    Ok(())
}

fn cmd_search(config: &AppConfig, term: &str, category: Option<SearchCategory>) -> AppResult<()> {
    let store = open_store(config)?;
    let results = search(&store, term, category)?;

    if results.is_empty() {
        println!("No results");
        return Ok(());
    }
    for result in results {
        println!(
            "  [{}] {} - {} | {} | {}",
            result.kind.kind(),
            result.id,
            result.name,
            result.details,
            result.additional_info.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn cmd_route_save(config: &AppConfig, form_path: &Path, id: Option<&str>) -> AppResult<()> {
    let store = open_store(config)?;
    let form: RouteForm = read_document(form_path)?;
    let editing = id.map(RecordId::new);

    let outcome = route_service::save_route(&store, &form, editing.as_ref())?;
    println!("✓ Saved route {} ({})", outcome.route.name, outcome.route.id);
    for child_id in &outcome.incomplete {
        println!("  ! no address could be derived for child {}", child_id);
    }
    Ok(())
}

fn days_label(route: &Route) -> String {
    let days: Vec<&str> = route
        .active_days
        .iter()
        .map(|d| match d {
            ActiveDay::Weekdays => "Sun-Thu",
            ActiveDay::Friday => "Fri",
        })
        .collect();
    days.join(", ")
}

fn cmd_route_list(config: &AppConfig, filter: RouteFilter) -> AppResult<()> {
    let store = open_store(config)?;
    let routes = route_service::list_routes(&store)?;
    let matching = route_service::filter_routes(&routes, &filter);
    let groups = route_service::group_routes(matching);

    let sections = groups.sections();
    if sections.is_empty() {
        println!("No routes found");
        return Ok(());
    }
    for (heading, routes) in sections {
        println!("{}:", heading);
        for route in routes {
            println!(
                "  {} - {} ({} children; {})",
                route.id,
                route.name,
                route.children.len(),
                days_label(route)
            );
        }
    }
    Ok(())
}

fn cmd_route_sheet(config: &AppConfig, id: &str) -> AppResult<()> {
    let store = open_store(config)?;
    let route: Route = directory::get_entity(&store, &RecordId::new(id))?;
    let directory = Directory::load(&store)?;
    let sheet = route_service::route_sheet(&route, &directory);

    let permanence = if sheet.is_permanent { "permanent" } else { "temporary" };
    println!("{} [{}, {}]", sheet.name, sheet.route_type.name(), permanence);
    println!("  days: {}", days_label(&route));
    for row in &sheet.rows {
        let name = row
            .child_name
            .clone()
            .unwrap_or_else(|| format!("(missing child {})", row.child_id));
        println!("  {}. {} {}", row.position, row.pickup_time, name);
        if let Some(phone) = &row.child_phone {
            println!("     phone: {}", phone);
        }
        println!("     pickup: {}", row.pickup_address);
        if let Some(dropoff) = &row.dropoff_address {
            println!("     dropoff: {}", dropoff);
        }
        if let Some(escort) = &row.escort {
            println!("     escort: {}", escort);
        }
    }
    if let Some(notes) = &sheet.notes {
        println!("  notes: {}", notes);
    }
    Ok(())
}

fn cmd_route_stale(config: &AppConfig) -> AppResult<()> {
    let store = open_store(config)?;
    let routes = route_service::list_routes(&store)?;
    let directory = Directory::load(&store)?;

    let mut any = false;
    for route in &routes {
        let stale =
            route_service::stale_entries(route, &directory.children, &directory.institutions);
        if stale.is_empty() {
            continue;
        }
        any = true;
        let ids: Vec<String> = stale.iter().map(ToString::to_string).collect();
        println!("  {} - {}: {}", route.id, route.name, ids.join(", "));
    }
    if !any {
        println!("✓ All route snapshots are current");
    }
    Ok(())
}

fn cmd_route_refresh(config: &AppConfig, id: &str) -> AppResult<()> {
    let store = open_store(config)?;
    let outcome = route_service::refresh_route_snapshots(&store, &RecordId::new(id))?;
    if outcome.refreshed.is_empty() {
        println!("✓ Route snapshots already current");
    } else {
        println!("✓ Refreshed {} stop(s)", outcome.refreshed.len());
    }
    for child_id in &outcome.kept {
        println!("  ! child {} not found, kept saved addresses", child_id);
    }
    for child_id in &outcome.incomplete {
        println!("  ! child {} has an empty derived address", child_id);
    }
    Ok(())
}

fn cmd_route_delete(config: &AppConfig, id: &str) -> AppResult<()> {
    let store = open_store(config)?;
    route_service::delete_route(&store, &RecordId::new(id))?;
    println!("✓ Deleted route {}", id);
    Ok(())
}

fn cmd_export(config: &AppConfig, path: &Path) -> AppResult<()> {
    let store = open_store(config)?;
    let dataset = rb_store::export_dataset(&store)?;
    rb_schema::save_dataset(path, &dataset)?;
    println!(
        "✓ Exported {} children, {} institutions, {} routes to {}",
        dataset.children.len(),
        dataset.institutions.len(),
        dataset.routes.len(),
        path.display()
    );
    Ok(())
}

fn cmd_import(config: &AppConfig, path: &Path) -> AppResult<()> {
    let store = open_store(config)?;
    let dataset = rb_schema::load_dataset(path)?;
    let count = rb_store::import_dataset(&store, &dataset)?;
    println!("✓ Imported {} records from {}", count, path.display());
    Ok(())
}

fn cmd_sidebar(config: &AppConfig, toggle: bool) -> AppResult<()> {
    let storage = JsonFilePreferences::new(config.preferences_path.clone());
    let mut sidebar = sidebar_preference(&storage)?;

    if toggle {
        sidebar.subscribe(|open| tracing::info!(open = *open, "sidebar toggled"));
        let open = sidebar.toggle();
        save_preference(&storage, SIDEBAR_OPEN, &open)?;
    }
    println!("sidebar: {}", if *sidebar.get() { "open" } else { "closed" });
    Ok(())
}
