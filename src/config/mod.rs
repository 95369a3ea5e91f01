// Configuration module entry point
// Layers config file, environment and command line into one `Config`

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::Config;

#[cfg(test)]
pub(crate) use state::test_support;

/// Environment variable holding the default listening port
pub const PORT_ENV: &str = "PORT";

impl Config {
    /// Load configuration from the given TOML file and the process environment
    pub fn load(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_from(Some(config_path), std::env::var(PORT_ENV).ok())
    }

    /// Load configuration with an explicit `PORT` value
    ///
    /// Precedence (lowest first): built-in defaults, config file,
    /// `RESEARCH__<SECTION>__<KEY>` variables, `port_env`.
    pub fn load_from(
        config_path: Option<&str>,
        port_env: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("paths.root_dir", ".")?
            .set_default("paths.data_dir", "August")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "simple")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "ResearchData/0.1")?
            .set_default("http.index_files", vec!["index.html", "index.htm"])?
            .set_default("http.directory_listing", true)?
            .set_default("api.restrict_to_data_dir", false)?;

        if let Some(path) = config_path {
            builder = builder.add_source(
                config::File::new(path, config::FileFormat::Toml).required(false),
            );
        }

        builder
            .add_source(
                config::Environment::with_prefix("RESEARCH")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_override_option("server.port", port_env)?
            .build()?
            .try_deserialize()
    }

    /// Apply the optional `[port]` command line argument.
    ///
    /// An argument that is not a valid port leaves the already resolved port in
    /// place and comes back as a warning message.
    pub fn apply_port_arg(&mut self, arg: Option<&str>) -> Result<(), String> {
        let Some(raw) = arg else {
            return Ok(());
        };
        match raw.trim().parse::<u16>() {
            Ok(port) => {
                self.server.port = port;
                Ok(())
            }
            Err(_) => Err(format!(
                "Invalid port number '{raw}'. Using default port {}.",
                self.server.port
            )),
        }
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults(port_env: Option<&str>) -> Config {
        Config::load_from(None, port_env.map(ToString::to_string)).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cfg = defaults(None);
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.paths.data_dir, "August");
        assert_eq!(cfg.http.index_files, vec!["index.html", "index.htm"]);
        assert!(cfg.http.directory_listing);
        assert!(!cfg.api.restrict_to_data_dir);
        assert_eq!(cfg.logging.access_log_format, "simple");
    }

    #[test]
    fn test_port_env_overrides_default() {
        assert_eq!(defaults(Some("9000")).server.port, 9000);
    }

    #[test]
    fn test_invalid_port_env_is_an_error() {
        assert!(Config::load_from(None, Some("eighty".to_string())).is_err());
    }

    #[test]
    fn test_cli_port_overrides_env() {
        let mut cfg = defaults(Some("9000"));
        assert!(cfg.apply_port_arg(Some("9090")).is_ok());
        assert_eq!(cfg.server.port, 9090);
    }

    #[test]
    fn test_invalid_cli_port_keeps_resolved_default() {
        let mut cfg = defaults(Some("9000"));
        let warning = cfg.apply_port_arg(Some("abc")).unwrap_err();
        assert!(warning.contains("9000"));
        assert_eq!(cfg.server.port, 9000);

        let mut cfg = defaults(None);
        assert!(cfg.apply_port_arg(Some("70000")).is_err());
        assert_eq!(cfg.server.port, 8000);
    }

    #[test]
    fn test_no_cli_port() {
        let mut cfg = defaults(None);
        assert!(cfg.apply_port_arg(None).is_ok());
        assert_eq!(cfg.server.port, 8000);
    }

    #[test]
    fn test_config_file_is_read_as_toml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("server.conf");
        std::fs::write(&path, "[server]\nport = 9100\n\n[paths]\ndata_dir = \"September\"\n")
            .unwrap();

        let cfg = Config::load_from(path.to_str(), None).unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.paths.data_dir, "September");
    }

    #[test]
    fn test_sibling_formats_are_not_picked_up() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("config.json"), r#"{"server": {"port": 9200}}"#).unwrap();

        let path = tmp.path().join("config.toml");
        let cfg = Config::load_from(path.to_str(), None).unwrap();
        assert_eq!(cfg.server.port, 8000);
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = defaults(None);
        cfg.server.host = "127.0.0.1".to_string();
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:8000".parse::<SocketAddr>().unwrap()
        );
        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
