use anyhow::Result;
use clap::Parser as _;
use cufi_core::{
    entities::{parse_date, EventId},
    token::{SigningSecrets, TokenService},
};
use cufi_db_sqlite::Connections;

mod cli;
mod config;
mod daily_import;
mod gateways;

use cli::{Args, Command};
use cufi_application::prelude as flows;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Args { config, command } = Args::parse();
    let cfg = config::Config::try_load_from_file_or_default(config)?;

    log::info!("Connecting to SQLite database {}", cfg.db.conn_sqlite);
    let connections = Connections::init(&cfg.db.conn_sqlite, cfg.db.conn_pool_size.into())?;
    cufi_db_sqlite::run_embedded_database_migrations(connections.exclusive()?)?;

    match command.unwrap_or(Command::Run) {
        Command::Run => {
            let feed = gateways::feed_gateway(&cfg.feed);
            let push = gateways::push_gateway(cfg.push.gateway);
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(daily_import::run(connections, feed, push, cfg.ingestion));
        }
        Command::Import => {
            let feed = gateways::feed_gateway(&cfg.feed);
            let summary = flows::import_events_from_feed(&connections, &feed)?;
            println!("{summary:?}");
        }
        Command::ImportFile { file } => {
            let json = std::fs::read_to_string(&file)?;
            let summary = flows::import_events_json(&connections, &json)?;
            println!("{summary:?}");
        }
        Command::Notify { today } => {
            let today = match today {
                Some(day) => parse_date(&day)?,
                None => daily_import::now().date(),
            };
            let push = gateways::push_gateway(cfg.push.gateway);
            let sent = flows::notify_near_events(&connections, &push, today)?;
            println!("Sent {sent} notification(s)");
        }
        Command::Login {
            user_id,
            device_token,
        } => {
            let tokens = token_service(cfg.auth.secrets);
            let token = flows::login(
                &connections,
                &tokens,
                &user_id.into(),
                device_token,
                cfg.auth.token_lifetime,
            )?;
            println!("{token}");
        }
        Command::Logout { token } => {
            let user_id = flows::logout(&connections, &token)?;
            println!("Logged out {user_id}");
        }
        Command::DeleteEvent { id } => {
            flows::delete_event(&connections, EventId::new(id))?;
            log::info!("Deleted event {id}");
        }
    }
    Ok(())
}

fn token_service(secrets: Option<SigningSecrets>) -> TokenService {
    let secrets = secrets.unwrap_or_else(|| {
        log::warn!("No signing secrets configured: use random secrets that are lost on exit");
        SigningSecrets::random()
    });
    TokenService::new(secrets)
}
