mod config;

use anyhow::{anyhow, Context, Result};
use kube::{Client, Config};
use log::{error, info};
use mesh_inspector_lib::{namespace_overview, service_details, KubeStore};

use config::Settings;

#[tokio::main]
async fn main() -> Result<()> {

    if cfg!(debug_assertions) {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
    else { env_logger::init(); }

    let settings = Settings::from_env()?;

    let cluster_config = Config::incluster();
    let client = match cluster_config {
        Ok(config) => {
            info!("Running mesh_inspector inside cluster.");
            Client::try_from(config)
        }
        Err(_) => {
            info!("Running mesh_inspector outside cluster.");
            Client::try_default().await
        }
    };

    let store = match client {
        Ok(client) => KubeStore::new(client),
        Err(e) => {
            error!("Failed to start Kubernetes client.");
            return Err(anyhow!(e));
        }
    };

    let output = match &settings.service {
        Some(service) => {
            let details = service_details(&store, &settings.namespace, service)
                .await
                .with_context(|| format!("Failed to inspect service {service}"))?;
            serde_json::to_string_pretty(&details)?
        }
        None => {
            let overview = namespace_overview(&store, &settings.namespace)
                .await
                .with_context(|| format!("Failed to inspect namespace {}", settings.namespace))?;
            serde_json::to_string_pretty(&overview)?
        }
    };

    println!("{output}");
    Ok(())
}
