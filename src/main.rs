use std::error::Error;
use student_performance_analyzer::config::AppConfig;
use student_performance_analyzer::model::ModelRegistry;
use student_performance_analyzer::{telemetry, web};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    telemetry::init(config.log_level.as_deref())?;

    // Both models must load before the form is served.
    let registry = match ModelRegistry::load(&config.models) {
        Ok(registry) => registry,
        Err(err) => {
            tracing::error!(error = %err, "cannot start without both models");
            return Err(err.into());
        }
    };

    let addr = config.socket_addr()?;
    tracing::info!(range_policy = ?config.range_policy, "visit http://{addr} in your browser");

    web::start_api(registry, config.range_policy, addr).await?;

    Ok(())
}
