use anyhow::Result;
use tracing::info;

use sparkify_etl::config::Config;

// Drop every star-schema table and create it again empty.
fn main() -> Result<()> {
    sparkify_etl::logging::init()?;

    let cfg = Config::default();
    sparkify_etl::create_tables(&cfg)?;
    info!(database = %cfg.database_path.display(), "Sparkify tables created");
    Ok(())
}
