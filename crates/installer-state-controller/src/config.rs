use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "installer-state-controller")]
#[command(about = "Installer state controller - reports why installer pods are stuck", long_about = None)]
pub struct Cli {
    #[arg(short, long, value_name = "FILE", default_value = "./config.yaml", help = "Path to configuration file")]
    pub config: PathBuf,

    #[arg(long, env = "LOG_LEVEL", help = "Log level: trace, debug, info, warn, error [env: LOG_LEVEL or INSTALLER_STATE_LOG_LEVEL]")]
    pub log_level: Option<String>,

    #[arg(long, env = "KUBE_NAMESPACE", help = "Namespace the installer pods run in [env: KUBE_NAMESPACE or INSTALLER_STATE_KUBERNETES__NAMESPACE]")]
    pub kube_namespace: Option<String>,

    #[arg(long, env = "KUBE_CONTEXT", help = "Kubernetes context to use [env: KUBE_CONTEXT or INSTALLER_STATE_KUBERNETES__CONTEXT]")]
    pub kube_context: Option<String>,

    #[arg(long, help = "Controller instance name, prefixed to the field manager and event reporter")]
    pub instance_name: Option<String>,

    #[arg(long, help = "Seconds between periodic sync passes")]
    pub resync_interval_secs: Option<u64>,

    #[arg(long, help = "Run a single sync pass, print the published conditions and exit")]
    pub once: bool,
}

fn remove_nulls(value: serde_json::Value) -> serde_json::Value {
    use serde_json::{Map, Value};

    match value {
        Value::Object(map) => {
            let filtered: Map<String, Value> = map
                .into_iter()
                .filter_map(|(k, v)| {
                    let cleaned = remove_nulls(v);
                    if cleaned.is_null() {
                        None
                    } else if let Value::Object(ref obj) = cleaned {
                        if obj.is_empty() { None } else { Some((k, cleaned)) }
                    } else {
                        Some((k, cleaned))
                    }
                })
                .collect();
            Value::Object(filtered)
        }
        other => other,
    }
}

impl Cli {
    fn to_figment_map(&self) -> serde_json::Value {
        use serde_json::json;

        let value = json!({
            "log_level": self.log_level,
            "kubernetes": {
                "namespace": self.kube_namespace,
                "context": self.kube_context,
            },
            "controller": {
                "instance_name": self.instance_name,
                "resync_interval_secs": self.resync_interval_secs,
            }
        });

        remove_nulls(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KubernetesConfig {
    #[serde(default = "default_kube_namespace")]
    pub namespace: String,

    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default)]
    pub instance_name: String,

    #[serde(default = "default_resync_interval_secs")]
    pub resync_interval_secs: u64,

    #[serde(default = "default_list_page_size")]
    pub list_page_size: u32,
}

/// Identifies the operator resource whose status receives the conditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorResourceConfig {
    #[serde(default = "default_operator_group")]
    pub group: String,

    #[serde(default = "default_operator_version")]
    pub version: String,

    #[serde(default = "default_operator_kind")]
    pub kind: String,

    #[serde(default = "default_operator_plural")]
    pub plural: String,

    #[serde(default = "default_operator_name")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub kubernetes: KubernetesConfig,

    #[serde(default)]
    pub controller: ControllerConfig,

    #[serde(default)]
    pub operator: OperatorResourceConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_kube_namespace() -> String {
    "openshift-kube-apiserver".to_string()
}

fn default_resync_interval_secs() -> u64 {
    60
}

fn default_list_page_size() -> u32 {
    500
}

fn default_operator_group() -> String {
    "operator.openshift.io".to_string()
}

fn default_operator_version() -> String {
    "v1".to_string()
}

fn default_operator_kind() -> String {
    "KubeAPIServer".to_string()
}

fn default_operator_plural() -> String {
    "kubeapiservers".to_string()
}

fn default_operator_name() -> String {
    "cluster".to_string()
}

impl Default for KubernetesConfig {
    fn default() -> Self {
        Self {
            namespace: default_kube_namespace(),
            context: None,
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            instance_name: String::new(),
            resync_interval_secs: default_resync_interval_secs(),
            list_page_size: default_list_page_size(),
        }
    }
}

impl Default for OperatorResourceConfig {
    fn default() -> Self {
        Self {
            group: default_operator_group(),
            version: default_operator_version(),
            kind: default_operator_kind(),
            plural: default_operator_plural(),
            name: default_operator_name(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            kubernetes: KubernetesConfig::default(),
            controller: ControllerConfig::default(),
            operator: OperatorResourceConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<(Self, Cli), figment::Error> {
        let cli = Cli::parse();
        let config = Self::from_cli(&cli)?;
        Ok((config, cli))
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, figment::Error> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if cli.config.exists() {
            figment = figment.merge(Yaml::file(&cli.config));
        }

        figment = figment
            .merge(Env::prefixed("INSTALLER_STATE_").split("__"))
            .merge(Serialized::defaults(cli.to_figment_map()));

        figment.extract()
    }
}
