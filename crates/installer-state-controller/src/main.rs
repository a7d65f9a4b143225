use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use kube::config::{KubeConfigOptions, Kubeconfig};
use tokio_util::sync::CancellationToken;
use tracing::info;

use installer_state_controller::{
    config::{AppConfig, KubernetesConfig},
    service::{self, util::cancel_on_signal},
    state::AppState,
};

async fn kube_client(config: &KubernetesConfig) -> anyhow::Result<kube::Client> {
    let Some(context) = &config.context else {
        return kube::Client::try_default()
            .await
            .context("Failed to initialize Kubernetes client");
    };
    let kubeconfig = Kubeconfig::read().context("Failed to read kubeconfig")?;
    let options = KubeConfigOptions {
        context: Some(context.clone()),
        ..Default::default()
    };
    let client_config = kube::Config::from_custom_kubeconfig(kubeconfig, &options)
        .await
        .with_context(|| format!("Failed to load Kubernetes context {}", context))?;
    kube::Client::try_from(client_config).context("Failed to initialize Kubernetes client")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, cli) = AppConfig::load().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("Starting installer state controller");
    info!("Configuration loaded:");
    info!("  Log level: {}", config.log_level);
    info!("  Kubernetes namespace: {}", config.kubernetes.namespace);
    if let Some(ctx) = &config.kubernetes.context {
        info!("  Kubernetes context: {}", ctx);
    }
    info!(
        "  Operator resource: {}.{}/{} {}",
        config.operator.plural, config.operator.group, config.operator.version, config.operator.name
    );
    info!("  Resync interval: {}s", config.controller.resync_interval_secs);

    let client = kube_client(&config.kubernetes).await?;
    info!("Kubernetes client initialized");

    let state = AppState::new(client, &config);
    let controller = Arc::new(state.installer_state_controller(&config));
    info!("Controller instance: {}", controller.instance_name());

    let ct = CancellationToken::new();
    cancel_on_signal(ct.clone());

    if cli.once {
        let conditions = controller
            .sync(&ct)
            .await
            .context("Installer state sync failed")?;
        println!("{}", serde_json::to_string_pretty(&conditions)?);
        return Ok(());
    }

    service::run(
        state,
        controller,
        Duration::from_secs(config.controller.resync_interval_secs.max(1)),
        ct,
    )
    .await;

    Ok(())
}
