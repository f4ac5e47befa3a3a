//! CLI configuration.
//!
//! Only the ABI location and the default log filter are configurable. The
//! ABI path comes from `--abi`, then `MARSHAL_ABI`, then `abi.json` in the
//! working directory.

use std::path::PathBuf;

use marshal::Marshaler;

/// Environment variable naming the ABI document.
pub const ABI_ENV: &str = "MARSHAL_ABI";

/// Configuration for the `marshal` binary.
#[derive(Clone, Debug)]
pub struct CliConfig {
    /// Path of the ABI JSON document.
    pub abi_path: PathBuf,
    /// Tracing filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            abi_path: PathBuf::from("abi.json"),
            log_filter: "marshal=info,marshal_cli=info".to_string(),
        }
    }
}

impl CliConfig {
    /// Applies a command-line (or env-provided) ABI path over the defaults.
    pub fn with_abi(mut self, abi: Option<PathBuf>) -> Self {
        if let Some(path) = abi {
            self.abi_path = path;
        }
        self
    }

    /// Reads and validates the configured ABI.
    pub fn load_marshaler(&self) -> Result<Marshaler, String> {
        let text = std::fs::read_to_string(&self.abi_path)
            .map_err(|e| format!("failed to read ABI at {}: {e}", self.abi_path.display()))?;
        let marshaler = Marshaler::from_json_str(&text)
            .map_err(|e| format!("invalid ABI at {}: {e}", self.abi_path.display()))?;
        tracing::info!(path = %self.abi_path.display(), "loaded ABI");
        Ok(marshaler)
    }
}
