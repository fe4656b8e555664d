//! Glyco CLI - Blood glucose tracker
//!
//! Usage:
//!   glyco init                    Initialize database
//!   glyco add 112 --type fasting  Log a reading
//!   glyco dashboard               Stats, trend and insights
//!   glyco serve --port 3000       Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Add {
            value,
            reading_type,
            at,
            notes,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_add(&db, value, reading_type, at.as_deref(), notes.as_deref())
        }
        Commands::List {
            reading_type,
            range,
            limit,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_list(&db, reading_type, range, limit)
        }
        Commands::Show { id } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_show(&db, &id)
        }
        Commands::Edit {
            id,
            value,
            reading_type,
            at,
            notes,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_edit(&db, &id, value, reading_type, at.as_deref(), notes)
        }
        Commands::Delete { id } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_delete(&db, &id)
        }
        Commands::Stats { days, json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_stats(&db, days, json)
        }
        Commands::Insight => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_insight(&db)
        }
        Commands::Trend => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_trend(&db)
        }
        Commands::Weekly => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_weekly(&db)
        }
        Commands::Dashboard { json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_dashboard(&db, json)
        }
        Commands::Export { format } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match format {
                ExportFormat::Csv { output } => commands::cmd_export_csv(&db, output),
                ExportFormat::Report { output } => commands::cmd_export_report(&db, output),
                ExportFormat::Json { output } => commands::cmd_export_json(&db, output),
            }
        }
        Commands::Import { file } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_import(&db, &file)
        }
        Commands::Backup { action } => match action {
            BackupAction::Create { name, dir } => {
                let db = commands::open_db(&cli.db, cli.no_encrypt)?;
                commands::cmd_backup_create(&db, name.as_deref(), dir)
            }
            BackupAction::List { dir } => commands::cmd_backup_list(dir),
            BackupAction::Restore { name, dir } => {
                let db = commands::open_db(&cli.db, cli.no_encrypt)?;
                commands::cmd_backup_restore(&db, &name, dir)
            }
            BackupAction::Prune { keep, dir, yes } => commands::cmd_backup_prune(keep, dir, yes),
        },
        Commands::Profile { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(ProfileAction::Show) => commands::cmd_profile_show(&db),
                Some(ProfileAction::SetName { name }) => commands::cmd_profile_set_name(&db, &name),
            }
        }
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::Reset { yes } => commands::cmd_reset(&cli.db, yes, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                no_auth,
                cli.no_encrypt,
                static_dir.as_deref(),
            )
            .await
        }
    }
}
