use std::process::ExitCode;

use sphere_streams::SceneConfig;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sphere_streams=debug,wgpu_core=warn,wgpu_hal=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => match SceneConfig::load(&path) {
            Ok(config) => {
                tracing::info!(path = %path, "loaded scene config");
                config
            }
            Err(err) => {
                tracing::error!(path = %path, "invalid scene config: {}", err);
                return ExitCode::FAILURE;
            }
        },
        None => SceneConfig::default(),
    };

    tracing::info!(
        per_stream = config.n_instances,
        use_cube = config.use_cube,
        "starting sphere streams"
    );

    match sphere_streams::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
