use std::env;
use std::path::Path;

use config::Config as ConfigBuilder;
use config::ConfigBuilder as SourceBuilder;
use config::Environment;
use config::File;
use config::FileFormat;
use config::builder::DefaultState;
use serde::Deserialize;
use serde::Serialize;

use crate::user::errors::ConfigurationError;

/// Name under which the host registers the user provider.
pub const PROVIDER_ID: &str = "user_security.user_provider";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub security: SecurityConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SecurityConfig {
    /// Authentication subject the password encoder is registered for.
    pub document: String,
    /// Identifier of the user manager to bind. Required.
    #[serde(default)]
    pub manager: Option<String>,
    /// Password-hashing algorithm name.
    #[serde(default = "default_encoder")]
    pub encoder: String,
}

/// Password encoder entry contributed to the host's security configuration.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct EncoderRegistration {
    pub document: String,
    pub algorithm: String,
    pub encode_as_base64: bool,
    pub iterations: u32,
}

fn default_encoder() -> String {
    "sha256".to_string()
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SECURITY__MANAGER, SECURITY__ENCODER, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// A missing manager is fatal.
    pub fn load() -> Result<Self, ConfigurationError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        // Example: SECURITY__MANAGER=app.user_manager overrides security.manager
        Self::load_from(
            Path::new("config"),
            &run_mode,
            Environment::default().separator("__"),
        )
    }

    /// Load `{config_dir}/default` then `{config_dir}/{run_mode}`, with
    /// `environment` layered on top.
    pub fn load_from(
        config_dir: &Path,
        run_mode: &str,
        environment: Environment,
    ) -> Result<Self, ConfigurationError> {
        let default_file = config_dir.join("default");
        let run_mode_file = config_dir.join(run_mode);

        let builder = ConfigBuilder::builder()
            .add_source(File::with_name(&default_file.to_string_lossy()).required(false))
            .add_source(File::with_name(&run_mode_file.to_string_lossy()).required(false))
            .add_source(environment);

        Self::from_builder(builder)
    }

    /// Parse and validate configuration from a TOML document.
    pub fn from_toml(source: &str) -> Result<Self, ConfigurationError> {
        let builder = ConfigBuilder::builder().add_source(File::from_str(source, FileFormat::Toml));

        Self::from_builder(builder)
    }

    fn from_builder(builder: SourceBuilder<DefaultState>) -> Result<Self, ConfigurationError> {
        let config: Config = builder.build()?.try_deserialize()?;
        config.security.validate()?;

        tracing::info!(
            document = %config.security.document,
            manager = config.security.manager.as_deref().unwrap_or_default(),
            encoder = %config.security.encoder,
            "Configuration loaded"
        );

        Ok(config)
    }
}

impl SecurityConfig {
    /// Check required and non-empty values.
    ///
    /// # Errors
    /// * `MissingManager` - Manager is absent or empty
    /// * `EmptyValue` - Document or encoder is empty
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.document.is_empty() {
            return Err(ConfigurationError::EmptyValue("document"));
        }

        if self.manager.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigurationError::MissingManager);
        }

        if self.encoder.is_empty() {
            return Err(ConfigurationError::EmptyValue("encoder"));
        }

        Ok(())
    }

    /// Identifier of the bound user manager.
    ///
    /// # Errors
    /// * `MissingManager` - Manager is absent or empty
    pub fn manager_id(&self) -> Result<&str, ConfigurationError> {
        self.manager
            .as_deref()
            .filter(|manager| !manager.is_empty())
            .ok_or(ConfigurationError::MissingManager)
    }

    /// Encoder entry for the configured document: unencoded output, single iteration.
    pub fn encoder_registration(&self) -> EncoderRegistration {
        EncoderRegistration {
            document: self.document.clone(),
            algorithm: self.encoder.clone(),
            encode_as_base64: false,
            iterations: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_with_defaults() {
        let config = Config::from_toml(
            r#"
            [security]
            document = "email"
            manager = "app.user_manager"
            "#,
        )
        .unwrap();

        assert_eq!(config.security.document, "email");
        assert_eq!(config.security.manager_id().unwrap(), "app.user_manager");
        assert_eq!(config.security.encoder, "sha256");
    }

    #[test]
    fn test_from_toml_custom_encoder() {
        let config = Config::from_toml(
            r#"
            [security]
            document = "username"
            manager = "app.user_manager"
            encoder = "sha512"
            "#,
        )
        .unwrap();

        assert_eq!(config.security.encoder, "sha512");
    }

    #[test]
    fn test_missing_manager_is_fatal() {
        let result = Config::from_toml(
            r#"
            [security]
            document = "email"
            "#,
        );

        assert!(matches!(result, Err(ConfigurationError::MissingManager)));
    }

    #[test]
    fn test_empty_manager_is_fatal() {
        let result = Config::from_toml(
            r#"
            [security]
            document = "email"
            manager = ""
            "#,
        );

        assert!(matches!(result, Err(ConfigurationError::MissingManager)));
    }

    #[test]
    fn test_empty_document_rejected() {
        let result = Config::from_toml(
            r#"
            [security]
            document = ""
            manager = "app.user_manager"
            "#,
        );

        assert!(matches!(
            result,
            Err(ConfigurationError::EmptyValue("document"))
        ));
    }

    #[test]
    fn test_missing_document_fails_to_load() {
        let result = Config::from_toml(
            r#"
            [security]
            manager = "app.user_manager"
            "#,
        );

        assert!(matches!(result, Err(ConfigurationError::Load(_))));
    }

    #[test]
    fn test_encoder_registration() {
        let security = SecurityConfig {
            document: "email".to_string(),
            manager: Some("app.user_manager".to_string()),
            encoder: default_encoder(),
        };

        assert_eq!(
            security.encoder_registration(),
            EncoderRegistration {
                document: "email".to_string(),
                algorithm: "sha256".to_string(),
                encode_as_base64: false,
                iterations: 1,
            }
        );
    }

    fn write_config_dir(files: &[(&str, &str)]) -> std::path::PathBuf {
        let dir = env::temp_dir().join(format!("user-security-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("Failed to create config dir");
        for (name, contents) in files {
            std::fs::write(dir.join(name), contents).expect("Failed to write config file");
        }
        dir
    }

    fn no_environment() -> Environment {
        Environment::default()
            .separator("__")
            .source(Some(config::Map::new()))
    }

    #[test]
    fn test_load_reads_manager_from_environment() {
        env::set_var("SECURITY__MANAGER", "app.user_manager");
        let result = Config::load();
        env::remove_var("SECURITY__MANAGER");

        let config = result.expect("Failed to load configuration");
        assert_eq!(config.security.manager_id().unwrap(), "app.user_manager");
        assert_eq!(config.security.document, "email");
        assert_eq!(config.security.encoder, "sha256");
    }

    #[test]
    fn test_load_from_run_mode_file_overrides_default() {
        let dir = write_config_dir(&[
            (
                "default.toml",
                "[security]\ndocument = \"email\"\nmanager = \"app.default_manager\"\n",
            ),
            (
                "staging.toml",
                "[security]\nmanager = \"app.staging_manager\"\nencoder = \"sha512\"\n",
            ),
        ]);

        let staging = Config::load_from(&dir, "staging", no_environment());
        let production = Config::load_from(&dir, "production", no_environment());
        std::fs::remove_dir_all(&dir).ok();

        let staging = staging.expect("Failed to load staging configuration");
        assert_eq!(staging.security.document, "email");
        assert_eq!(staging.security.manager_id().unwrap(), "app.staging_manager");
        assert_eq!(staging.security.encoder, "sha512");

        let production = production.expect("Failed to load production configuration");
        assert_eq!(
            production.security.manager_id().unwrap(),
            "app.default_manager"
        );
        assert_eq!(production.security.encoder, "sha256");
    }

    #[test]
    fn test_load_from_environment_overrides_files() {
        let dir = write_config_dir(&[(
            "default.toml",
            "[security]\ndocument = \"email\"\nmanager = \"app.default_manager\"\n",
        )]);

        let mut variables = config::Map::new();
        variables.insert("SECURITY__MANAGER".to_string(), "app.env_manager".to_string());
        variables.insert("SECURITY__DOCUMENT".to_string(), "username".to_string());
        let environment = Environment::default()
            .separator("__")
            .source(Some(variables));

        let result = Config::load_from(&dir, "development", environment);
        std::fs::remove_dir_all(&dir).ok();

        let config = result.expect("Failed to load configuration");
        assert_eq!(config.security.manager_id().unwrap(), "app.env_manager");
        assert_eq!(config.security.document, "username");
    }

    #[test]
    fn test_load_from_without_manager_is_fatal() {
        let dir = write_config_dir(&[("default.toml", "[security]\ndocument = \"email\"\n")]);

        let result = Config::load_from(&dir, "development", no_environment());
        std::fs::remove_dir_all(&dir).ok();

        assert!(matches!(result, Err(ConfigurationError::MissingManager)));
    }
}
