use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::audit::audit_or_warn;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the media directory for durable clips
///  - the SQLite log store with all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = cfg.database_path();

    println!("⚙️  Initializing esmlogger…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {}", db_path.display());
    println!("🎞️  Media dir  : {}", cfg.media_path().display());

    let pool = DbPool::open(&db_path)?;
    println!("✅ Database initialized at {}", db_path.display());

    pool.with_conn(|conn| {
        audit_or_warn(
            conn,
            "init",
            "Database initialized",
            &format!("Database initialized at {}", db_path.display()),
        );
        Ok(())
    })?;

    println!("🎉 esmlogger initialization completed!");
    Ok(())
}
