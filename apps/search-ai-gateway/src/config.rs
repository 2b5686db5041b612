//! Configuration for the Search AI gateway

use core_config::{app_info, server::ServerConfig, AppInfo, FromEnv};
use domain_search_ai::{AzureOpenAIConfig, AzureSearchConfig, RetryConfig, SearchPolicy};

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub search: AzureSearchConfig,
    pub openai: AzureOpenAIConfig,
    pub policy: SearchPolicy,
    pub retry: RetryConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            search: AzureSearchConfig::from_env()?,
            openai: AzureOpenAIConfig::from_env()?,
            policy: SearchPolicy::from_env()?,
            retry: RetryConfig::from_env()?,
        })
    }
}
