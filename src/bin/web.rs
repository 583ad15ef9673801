//! Single binary web server: JSON API over the tournament engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, FLS_CATALOG (catalog JSON file), FLS_SAVE_DIR (save files).
//! Sessions idle for 12 hours are dropped.

use actix_web::{
    get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use fls_tournament_web::{
    advance_phase, back_to_menu, builtin_catalog, confirm_teams, create_custom_tournament,
    find_competition, from_snapshot, load_snapshot, open_custom_creation, parse_catalog,
    select_competition, set_selected_teams, submit_score, to_snapshot, tournament_view, Competition,
    CustomCompetitionRequest, MatchId, Tournament, TournamentError,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Identifier of one browser session's tournament.
type TournamentId = Uuid;

/// Per-session entry: tournament state + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

struct AppState {
    sessions: RwLock<HashMap<TournamentId, TournamentEntry>>,
    catalog: Vec<Competition>,
    save_dir: PathBuf,
}

type SharedState = Data<AppState>;

/// Inactivity threshold: sessions not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct SelectCompetitionBody {
    competition_id: String,
}

#[derive(Deserialize)]
struct SelectedTeamsBody {
    teams: Vec<String>,
}

#[derive(Deserialize)]
struct ScoreBody {
    match_id: MatchId,
    home: u32,
    away: u32,
}

#[derive(Deserialize)]
struct LoadFileBody {
    file: String,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

/// Run one transition on a session under the write lock and answer with the new view.
fn with_tournament<F>(state: &AppState, id: TournamentId, action: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> Result<(), TournamentError>,
{
    let mut g = match state.sessions.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match action(t) {
        Ok(()) => HttpResponse::Ok().json(tournament_view(t)),
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "fls-tournament-web",
    })
}

/// Competitions available on the menu.
#[get("/api/competitions")]
async fn api_competitions(state: SharedState) -> HttpResponse {
    HttpResponse::Ok().json(&state.catalog)
}

/// Create a new session at the menu (client stores the id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: SharedState) -> HttpResponse {
    let tournament = Tournament::new();
    let id = Uuid::new_v4();
    let view = tournament_view(&tournament);
    let mut g = match state.sessions.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.insert(
        id,
        TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        },
    );
    HttpResponse::Ok().json(serde_json::json!({ "id": id, "view": view }))
}

/// Raw state of a session (404 if not found).
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: SharedState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.sessions.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.tournament)
        }
        None => not_found(),
    }
}

/// Display data for the current phase.
#[get("/api/tournaments/{id}/view")]
async fn api_view(state: SharedState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |_| Ok(()))
}

/// Start a catalog competition (Menu only).
#[post("/api/tournaments/{id}/select")]
async fn api_select(state: SharedState, path: Path<TournamentPath>, body: Json<SelectCompetitionBody>) -> HttpResponse {
    let Some(comp) = find_competition(&state.catalog, &body.competition_id).cloned() else {
        return HttpResponse::NotFound().json(serde_json::json!({ "error": "No such competition" }));
    };
    with_tournament(&state, path.id, |t| select_competition(t, comp))
}

/// Open the custom competition form (Menu only).
#[post("/api/tournaments/{id}/custom/open")]
async fn api_custom_open(state: SharedState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, open_custom_creation)
}

/// Leave the custom competition form.
#[post("/api/tournaments/{id}/custom/cancel")]
async fn api_custom_cancel(state: SharedState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, back_to_menu)
}

/// Create and start a custom competition (CustomCreation only).
/// The body carries the new view and the uneven-knockout warning, if any.
#[post("/api/tournaments/{id}/custom")]
async fn api_custom_create(
    state: SharedState,
    path: Path<TournamentPath>,
    body: Json<CustomCompetitionRequest>,
) -> HttpResponse {
    let mut g = match state.sessions.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let Some(entry) = g.get_mut(&path.id) else {
        return not_found();
    };
    entry.last_activity = Instant::now();
    match create_custom_tournament(&mut entry.tournament, &body) {
        Ok(warning) => HttpResponse::Ok().json(serde_json::json!({
            "view": tournament_view(&entry.tournament),
            "warning": warning,
        })),
        Err(e) => error_response(&e),
    }
}

/// Replace the team selection (TeamSelection only).
#[put("/api/tournaments/{id}/selected-teams")]
async fn api_selected_teams(state: SharedState, path: Path<TournamentPath>, body: Json<SelectedTeamsBody>) -> HttpResponse {
    let teams = body.into_inner().teams;
    with_tournament(&state, path.id, |t| set_selected_teams(t, teams))
}

/// Confirm the team selection and start the main stage.
#[post("/api/tournaments/{id}/confirm-teams")]
async fn api_confirm_teams(state: SharedState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, confirm_teams)
}

/// Enter a pending score for a match of the active round.
#[put("/api/tournaments/{id}/scores")]
async fn api_submit_score(state: SharedState, path: Path<TournamentPath>, body: Json<ScoreBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| submit_score(t, body.match_id, body.home, body.away))
}

/// Commit the active round and move on (qualifying, league, league playoffs or knockout).
#[post("/api/tournaments/{id}/advance")]
async fn api_advance(state: SharedState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, advance_phase)
}

/// New tournament: back to the menu.
#[post("/api/tournaments/{id}/reset")]
async fn api_reset(state: SharedState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        t.reset();
        Ok(())
    })
}

/// Download the whole state as a save file.
#[get("/api/tournaments/{id}/snapshot")]
async fn api_export_snapshot(state: SharedState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.sessions.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let Some(entry) = g.get(&path.id) else {
        return not_found();
    };
    match to_snapshot(&entry.tournament) {
        Ok(json) => HttpResponse::Ok()
            .content_type("application/json")
            .insert_header(("Content-Disposition", "attachment; filename=\"fls_save.json\""))
            .body(json),
        Err(e) => error_response(&e),
    }
}

/// Replace the whole state with an uploaded save file.
#[put("/api/tournaments/{id}/snapshot")]
async fn api_import_snapshot(state: SharedState, path: Path<TournamentPath>, body: String) -> HttpResponse {
    with_tournament(&state, path.id, |t| load_snapshot(t, &body))
}

/// Write the state to the save directory.
#[post("/api/tournaments/{id}/save")]
async fn api_save(state: SharedState, path: Path<TournamentPath>) -> HttpResponse {
    let json = {
        let g = match state.sessions.read() {
            Ok(guard) => guard,
            Err(_) => return HttpResponse::InternalServerError().body("lock error"),
        };
        let Some(entry) = g.get(&path.id) else {
            return not_found();
        };
        match to_snapshot(&entry.tournament) {
            Ok(json) => json,
            Err(e) => return error_response(&e),
        }
    };
    let file = format!("fls_save_{}.json", chrono::Local::now().format("%Y%m%d-%H%M%S"));
    if let Err(e) = tokio::fs::create_dir_all(&state.save_dir).await {
        log::error!("Could not create save directory {:?}: {}", state.save_dir, e);
        return HttpResponse::InternalServerError().json(serde_json::json!({ "error": "Could not create the save file" }));
    }
    match tokio::fs::write(state.save_dir.join(&file), json).await {
        Ok(()) => {
            log::info!("Saved tournament {} to {}", path.id, file);
            HttpResponse::Ok().json(serde_json::json!({ "file": file }))
        }
        Err(e) => {
            log::error!("Failed to save tournament {}: {}", path.id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": "Could not create the save file" }))
        }
    }
}

/// Load a file from the save directory. The current state is kept if the file is invalid.
#[post("/api/tournaments/{id}/load")]
async fn api_load(state: SharedState, path: Path<TournamentPath>, body: Json<LoadFileBody>) -> HttpResponse {
    let name = body.file.trim();
    if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": "Invalid save file name" }));
    }
    let text = match tokio::fs::read_to_string(state.save_dir.join(name)).await {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Failed to read save file {}: {}", name, e);
            return HttpResponse::BadRequest().json(serde_json::json!({ "error": "Error reading the file" }));
        }
    };
    let loaded = match from_snapshot(&text) {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };
    with_tournament(&state, path.id, |t| {
        *t = loaded;
        Ok(())
    })
}

/// Start-up settings, read once from the environment.
struct ServerConfig {
    host: String,
    port: u16,
    save_dir: PathBuf,
    catalog_path: Option<String>,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            save_dir: std::env::var("FLS_SAVE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("saves")),
            catalog_path: std::env::var("FLS_CATALOG").ok(),
        }
    }

    /// The catalog file if one is configured, else the built-in competitions.
    async fn load_catalog(&self) -> std::io::Result<Vec<Competition>> {
        let catalog = match &self.catalog_path {
            Some(path) => {
                let text = tokio::fs::read_to_string(path).await?;
                parse_catalog(&text)
            }
            None => builtin_catalog(),
        };
        catalog.map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

/// Drop sessions nobody has touched within `INACTIVITY_TIMEOUT`, checking every half hour.
fn spawn_session_sweeper(state: SharedState) {
    actix_web::rt::spawn(async move {
        let mut every = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            every.tick().await;
            let Ok(mut sessions) = state.sessions.write() else {
                log::warn!("Session map lock poisoned, skipping sweep");
                continue;
            };
            let open = sessions.len();
            sessions.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let dropped = open - sessions.len();
            if dropped > 0 {
                log::info!("Dropped {} idle session(s), {} still open", dropped, sessions.len());
            }
        }
    });
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let catalog = config.load_catalog().await?;
    log::info!(
        "Catalog: {} competitions ({}), save files in {:?}",
        catalog.len(),
        config.catalog_path.as_deref().unwrap_or("built-in"),
        config.save_dir
    );

    let state = Data::new(AppState {
        sessions: RwLock::new(HashMap::new()),
        catalog,
        save_dir: config.save_dir.clone(),
    });
    spawn_session_sweeper(state.clone());

    log::info!("FLS tournament server listening on http://{}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(4 * 1024 * 1024))
            .service(api_health)
            .service(api_competitions)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_view)
            .service(api_select)
            .service(api_custom_open)
            .service(api_custom_cancel)
            .service(api_custom_create)
            .service(api_selected_teams)
            .service(api_confirm_teams)
            .service(api_submit_score)
            .service(api_advance)
            .service(api_reset)
            .service(api_export_snapshot)
            .service(api_import_snapshot)
            .service(api_save)
            .service(api_load)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
