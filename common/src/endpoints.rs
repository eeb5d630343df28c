use std::{fmt, str::FromStr, time::Duration};

use crate::error::ModelError;

/// Clave con la que `remove-task` espera el id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveKey {
    Uuid,
    JobId,
}

/// Rutas del backend (relativas a la base `/api/`).
///
/// Las tres generaciones del panel hablan con el mismo backend pero con
/// nombres distintos; la diferencia queda en esta tabla y no en el código.
/// `None` = la generación no tiene ese endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub job_list: &'static str,
    pub run_info: &'static str,
    pub job_log_list: &'static str,
    pub job_log: &'static str,
    pub job_log_download: &'static str,
    pub start_resident: &'static str,
    pub stop_resident: &'static str,
    pub restart_resident: Option<&'static str>,
    pub run_task: &'static str,
    pub set_trigger: &'static str,
    pub save_task: &'static str,
    pub remove_task: &'static str,
    pub remove_key: RemoveKey,
    pub home_path: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiGeneration {
    /// Primer panel Vue.
    V1,
    /// Página admin sin framework.
    V2,
    /// Panel Vue actual.
    #[default]
    V3,
}

impl ApiGeneration {
    pub fn endpoints(self) -> Endpoints {
        let current = Endpoints {
            job_list: "job-list",
            run_info: "run-info",
            job_log_list: "job-log-list",
            job_log: "job-log",
            job_log_download: "job-log-download",
            start_resident: "run-job-resident-task",
            stop_resident: "stop-job-resident-task",
            restart_resident: Some("restart-job-resident-task"),
            run_task: "run-task",
            set_trigger: "open-close-task",
            save_task: "save-task",
            remove_task: "remove-task",
            remove_key: RemoveKey::Uuid,
            home_path: Some("home-path"),
        };

        match self {
            ApiGeneration::V3 => current,
            ApiGeneration::V2 => Endpoints {
                restart_resident: None,
                home_path: None,
                ..current
            },
            ApiGeneration::V1 => Endpoints {
                start_resident: "run-job",
                stop_resident: "stop-job",
                restart_resident: None,
                set_trigger: "run-open-close-task",
                save_task: "run-save",
                remove_key: RemoveKey::JobId,
                home_path: None,
                ..current
            },
        }
    }

    /// Timeout de transporte por defecto: 10s en las versiones Vue, ninguno
    /// en la página admin.
    pub fn default_timeout(self) -> Option<Duration> {
        match self {
            ApiGeneration::V1 | ApiGeneration::V3 => Some(Duration::from_secs(10)),
            ApiGeneration::V2 => None,
        }
    }
}

impl FromStr for ApiGeneration {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(ApiGeneration::V1),
            "v2" | "2" => Ok(ApiGeneration::V2),
            "v3" | "3" => Ok(ApiGeneration::V3),
            _ => Err(ModelError::UnknownGeneration(s.to_string())),
        }
    }
}

impl fmt::Display for ApiGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApiGeneration::V1 => "v1",
            ApiGeneration::V2 => "v2",
            ApiGeneration::V3 => "v3",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v1_usa_nombres_antiguos() {
        let e = ApiGeneration::V1.endpoints();
        assert_eq!(e.start_resident, "run-job");
        assert_eq!(e.stop_resident, "stop-job");
        assert_eq!(e.save_task, "run-save");
        assert_eq!(e.set_trigger, "run-open-close-task");
        assert_eq!(e.remove_key, RemoveKey::JobId);
        assert!(e.restart_resident.is_none());
    }

    #[test]
    fn solo_v3_tiene_restart_y_home() {
        assert!(ApiGeneration::V3.endpoints().restart_resident.is_some());
        assert!(ApiGeneration::V3.endpoints().home_path.is_some());
        assert!(ApiGeneration::V2.endpoints().restart_resident.is_none());
        assert!(ApiGeneration::V2.endpoints().home_path.is_none());
        assert_eq!(ApiGeneration::V2.endpoints().remove_key, RemoveKey::Uuid);
    }

    #[test]
    fn parsea_generacion() {
        assert_eq!("V2".parse::<ApiGeneration>().unwrap(), ApiGeneration::V2);
        assert_eq!(" v3 ".parse::<ApiGeneration>().unwrap(), ApiGeneration::V3);
        assert!(matches!(
            "v9".parse::<ApiGeneration>(),
            Err(ModelError::UnknownGeneration(_))
        ));
    }

    #[test]
    fn timeout_por_generacion() {
        assert_eq!(
            ApiGeneration::V3.default_timeout(),
            Some(Duration::from_secs(10))
        );
        assert_eq!(ApiGeneration::V2.default_timeout(), None);
    }
}
