use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use orbit_sphere::SceneConfig;

/// Environment variable naming an optional TOML config file.
const CONFIG_ENV: &str = "ORBIT_SPHERE_CONFIG";

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wgpu_core=warn,wgpu_hal=warn,naga=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let result = SceneConfig::load_or_default(config_path.as_deref()).and_then(orbit_sphere::run);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "orbit-sphere failed");
            ExitCode::FAILURE
        }
    }
}
