mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::handlers;
use masjid::config::AppConfig;
use masjid::db::run_migrations;
use masjid::models::{Role, SearchParams, Session};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;
    let session = resolve_session(&cli, &config)?;
    debug!("Acting as {} ({})", session.user, session.role);

    let db_path = match &cli.db {
        Some(path) => path.clone(),
        None => {
            AppConfig::ensure_data_dir()?;
            AppConfig::db_path()?
        }
    };
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    // Run migrations on every startup
    run_migrations(&conn).context("Preparing database")?;

    match cli.command {
        Commands::Search {
            by,
            query,
            attribute,
            lat,
            lng,
            radius,
            prayer_time,
            time_start,
            time_end,
            page,
            sort,
            json,
        } => {
            let params = SearchParams {
                by,
                query,
                attribute,
                lat,
                lng,
                radius,
                prayer_time,
                time_start,
                time_end,
                page,
                sort,
            };
            handlers::handle_search(&conn, &config, &params, json)?;
        }
        Commands::Show { id, json } => handlers::handle_show(&conn, id, json)?,
        Commands::Next { id, at, date } => {
            handlers::handle_next(&conn, &config, id, at.as_deref(), date.as_deref())?;
        }
        Commands::Window { time, offset } => handlers::handle_window(&config, &time, offset)?,
        Commands::Add { file } => handlers::handle_add(&conn, &session, &file)?,
        Commands::Update { id, file } => handlers::handle_update(&conn, &session, id, &file)?,
        Commands::Verify { id } => handlers::handle_verify(&conn, &session, id)?,
        Commands::Reject { id } => handlers::handle_reject(&conn, &session, id)?,
        Commands::Delete { id } => handlers::handle_delete(&conn, &session, id)?,
        Commands::Unverified => handlers::handle_unverified(&conn, &session)?,
    }

    Ok(())
}

/// Identity from `[identity]`, with `--role` / `--mosque-id` taking precedence.
fn resolve_session(cli: &Cli, config: &AppConfig) -> Result<Session> {
    let mut session = config.identity.session();
    if let Some(role) = &cli.role {
        session.role = role.parse::<Role>()?;
    }
    if cli.mosque_id.is_some() {
        session.mosque_id = cli.mosque_id;
    }
    Ok(session)
}
