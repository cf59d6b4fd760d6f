use anyhow::{Context, Result};
use tracing::Level;

use student_grades::{app, sqlite, SqliteConfig};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();

    let config = SqliteConfig::beside_executable();
    let conn = sqlite::open(&config)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app::run_and_close(conn, &config.schema, &mut out)
        .with_context(|| format!("grade report on {} failed", config.db_path.display()))
}
