//! Shared application service layer for rideboard.
//!
//! Business logic used by the CLI: entity CRUD, cross-reference
//! resolution, route building and persistence, search and preferences.

pub mod address;
pub mod config;
pub mod directory;
pub mod error;
pub mod preference;
pub mod resolve;
pub mod route_build;
pub mod route_editor;
pub mod route_form;
pub mod route_service;
pub mod search;

// Re-export key types for convenience
pub use address::{derive_dropoff_address, derive_pickup_address, format_address};
pub use config::AppConfig;
pub use directory::{
    Directory, EntitySummary, create_entity, delete_entity, get_entity, list_entities,
    list_summaries, update_entity,
};
pub use error::{AppError, AppResult};
pub use preference::{
    JsonFilePreferences, MemoryPreferences, ObservablePreference, PreferenceStorage,
    SIDEBAR_OPEN, SubscriptionId, load_preference, save_preference, sidebar_preference,
};
pub use resolve::{
    ChildDetails, ResolvedAuthority, ResolvedInstitution, resolve_authority_assignment,
    resolve_child_details, resolve_escort, resolve_institution_assignment,
};
pub use route_build::{
    RouteError, assemble_route, missing_addresses, sort_by_pickup_time, validate_route_children,
};
pub use route_editor::{EditMode, RouteEditor};
pub use route_form::{ChildSlot, RouteForm};
pub use route_service::{
    RefreshOutcome, RouteFilter, RouteGroups, RouteSaveOutcome, RouteSheet, RouteSheetRow,
    delete_route,
    filter_routes, group_routes, list_routes, refresh_route_snapshots, route_sheet, save_route,
    stale_entries,
};
pub use search::{SearchCategory, SearchResult, search, search_directory};
