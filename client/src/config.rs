use std::{env, time::Duration};

use common::ApiGeneration;
use tracing::warn;

use crate::heartbeat::DEFAULT_HEARTBEAT_INTERVAL;

pub const DEFAULT_BASE_URL: &str = "http://localhost:9090/api";

/// Configuración del panel.
/// - `ROOSTER_URL`: base de la API (default http://localhost:9090/api)
/// - `ROOSTER_API`: v1 | v2 | v3 (default v3)
/// - `ROOSTER_TIMEOUT_SECS`: timeout HTTP, 0 = sin timeout (default según versión)
/// - `ROOSTER_HEARTBEAT_MS`: intervalo del heartbeat (default 1000)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    pub base_url: String,
    pub generation: ApiGeneration,
    pub timeout: Option<Duration>,
    pub heartbeat_every: Duration,
}

impl Default for PanelConfig {
    fn default() -> Self {
        let generation = ApiGeneration::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            generation,
            timeout: generation.default_timeout(),
            heartbeat_every: DEFAULT_HEARTBEAT_INTERVAL,
        }
    }
}

impl PanelConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero leyendo de cualquier fuente (tests).
    /// Valores inválidos caen al default con un warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("ROOSTER_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let generation = match lookup("ROOSTER_API") {
            Some(raw) => raw.parse::<ApiGeneration>().unwrap_or_else(|e| {
                warn!("{}; usando {}", e, ApiGeneration::default());
                ApiGeneration::default()
            }),
            None => ApiGeneration::default(),
        };

        let timeout = match lookup("ROOSTER_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) => None,
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    warn!("ROOSTER_TIMEOUT_SECS inválido: {:?}", raw);
                    generation.default_timeout()
                }
            },
            None => generation.default_timeout(),
        };

        let heartbeat_every = lookup("ROOSTER_HEARTBEAT_MS")
            .and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Some(Duration::from_millis(ms)),
                _ => {
                    warn!("ROOSTER_HEARTBEAT_MS inválido: {:?}", raw);
                    None
                }
            })
            .unwrap_or(DEFAULT_HEARTBEAT_INTERVAL);

        Self {
            base_url,
            generation,
            timeout,
            heartbeat_every,
        }
    }

    /// Aplica los flags de la línea de comandos, que mandan sobre el entorno.
    /// Elegir versión con `--api` trae el timeout por defecto de esa versión
    /// salvo que también se pase `--timeout-secs` (0 = sin timeout).
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        generation: Option<ApiGeneration>,
        timeout_secs: Option<u64>,
    ) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if let Some(generation) = generation {
            self.generation = generation;
            self.timeout = generation.default_timeout();
        }
        if let Some(secs) = timeout_secs {
            self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        self
    }
}
