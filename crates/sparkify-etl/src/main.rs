use anyhow::Result;
use tracing::info;

use sparkify_etl::config::Config;

fn main() -> Result<()> {
    sparkify_etl::logging::init()?;

    let cfg = Config::default();
    info!(
        database = %cfg.database_path.display(),
        song_data = %cfg.song_data_dir.display(),
        log_data = %cfg.log_data_dir.display(),
        "Sparkify ETL starting"
    );

    // Any error propagates out of main: non-zero exit with the full error chain.
    let report = sparkify_etl::run(&cfg)?;
    info!(
        songs = %report.songs,
        logs = %report.logs,
        "Sparkify ETL finished"
    );
    Ok(())
}
