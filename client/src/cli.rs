use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use client::{Heartbeat, HttpRemote, Panel, PanelConfig, Remote, RowViews};
use common::{Action, ApiGeneration, LogQuery, OutputType, Row, TaskKind, DEFAULT_LOG_LINES};
use tracing::info;

#[derive(Parser)]
#[command(name = "rooster")]
#[command(about = "Panel de control del planificador rooster")]
struct Cli {
    /// Base de la API (manda sobre ROOSTER_URL)
    #[arg(long, global = true, value_name = "URL")]
    url: Option<String>,

    /// Versión de la API: v1, v2 o v3 (manda sobre ROOSTER_API)
    #[arg(long, global = true, value_parser = parse_generation)]
    api: Option<ApiGeneration>,

    /// Timeout HTTP en segundos, 0 = sin timeout
    #[arg(long, global = true, value_name = "SECS")]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

fn parse_generation(raw: &str) -> Result<ApiGeneration, String> {
    raw.parse().map_err(|e: common::ModelError| e.to_string())
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Resident,
    Scheduled,
}

impl From<KindArg> for TaskKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Resident => TaskKind::Resident,
            KindArg::Scheduled => TaskKind::Scheduled,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputArg {
    Discard,
    File,
}

impl From<OutputArg> for OutputType {
    fn from(output: OutputArg) -> Self {
        match output {
            OutputArg::Discard => OutputType::Discard,
            OutputArg::File => OutputType::FileDir,
        }
    }
}

/// Campos del formulario; los omitidos conservan el valor actual.
#[derive(Args)]
struct FormArgs {
    #[arg(long)]
    name: Option<String>,
    /// Ejecutable
    #[arg(long = "bin")]
    bin_path: Option<String>,
    /// Directorio de trabajo
    #[arg(long)]
    dir: Option<String>,
    /// Parámetros separados por espacios, ej: "-v --port 80"
    #[arg(long, allow_hyphen_values = true)]
    params: Option<String>,
    /// Expresión cron (sólo programadas)
    #[arg(long)]
    spec: Option<String>,
    #[arg(long, value_enum)]
    output: Option<OutputArg>,
    #[arg(long)]
    output_path: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Lista residentes y programadas
    List,
    /// Detalle de una tarea
    Show {
        #[arg(value_name = "TASK_ID")]
        id: String,
    },
    /// Inicia una residente
    Start {
        #[arg(value_name = "TASK_ID")]
        id: String,
    },
    /// Detiene una residente
    Stop {
        #[arg(value_name = "TASK_ID")]
        id: String,
    },
    /// Reinicia una residente (API v3)
    Restart {
        #[arg(value_name = "TASK_ID")]
        id: String,
    },
    /// Ejecuta una programada una vez, sin tocar su timer
    Run {
        #[arg(value_name = "TASK_ID")]
        id: String,
    },
    /// Habilita/deshabilita el timer de una programada
    Toggle {
        #[arg(value_name = "TASK_ID")]
        id: String,
    },
    /// Crea una tarea nueva
    Add {
        #[arg(long, value_enum)]
        kind: KindArg,
        #[command(flatten)]
        fields: FormArgs,
    },
    /// Edita una tarea existente (reemplazo completo)
    Edit {
        #[arg(value_name = "TASK_ID")]
        id: String,
        #[command(flatten)]
        fields: FormArgs,
    },
    /// Elimina una tarea
    Remove {
        #[arg(value_name = "TASK_ID")]
        id: String,
    },
    /// Lista los logs disponibles
    Logs,
    /// Muestra la cola del log de una tarea
    Log {
        #[arg(value_name = "TASK_ID")]
        id: String,
        #[arg(long, default_value_t = DEFAULT_LOG_LINES)]
        lines: u32,
        #[arg(long, default_value_t = 0)]
        bytes: u64,
    },
    /// Descarga el log completo de una tarea
    Download {
        #[arg(value_name = "TASK_ID")]
        id: String,
        /// Archivo destino (default: <nombre>_log.txt)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Uptime del backend
    Uptime {
        /// Sigue actualizando cada intervalo del heartbeat
        #[arg(long)]
        follow: bool,
    },
    /// Directorio home del backend (API v3)
    Home,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = PanelConfig::from_env().with_overrides(cli.url, cli.api, cli.timeout_secs);
    info!(
        "backend {} (api {}, timeout {:?})",
        config.base_url, config.generation, config.timeout
    );

    let remote = Arc::new(HttpRemote::from_config(&config)?);
    let panel = Panel::new(remote.clone());

    match cli.command {
        Commands::List => {
            load(&panel).await?;
            print_rows(&panel.rows());
        }

        Commands::Show { id } => {
            load(&panel).await?;
            let Some(task) = panel.store().find(&id) else {
                bail!("la tarea {id} no existe");
            };
            println!("Tarea {}", task.id);
            println!("  nombre     : {}", task.name);
            println!("  tipo       : {:?}", task.kind);
            println!("  estado     : {:?}", task.status);
            println!("  auto       : {}", task.auto_trigger);
            if task.kind == TaskKind::Scheduled {
                println!("  spec       : {}", task.schedule);
            }
            println!("  bin        : {}", task.bin_path);
            println!("  dir        : {}", task.work_dir);
            println!("  params     : {:?}", task.params);
            println!("  salida     : {:?}", task.options.output_type);
            if task.options.output_type == OutputType::FileDir {
                println!("  ruta log   : {}", task.options.output_path);
            }
            println!("  max fallos : {}", task.options.max_failures);
            match task.started_at() {
                Some(at) => println!("  último inicio : {}", at),
                None => println!("  último inicio : (nunca)"),
            }
            if let Some(at) = task.exited_at() {
                println!(
                    "  última salida : {} (código {}, {} ms)",
                    at,
                    task.last_exit_code,
                    task.last_duration_ns / 1_000_000
                );
            }
            if !task.link.is_empty() {
                println!("  link       : {}", task.link);
            }
        }

        Commands::Start { id } => act(&panel, Action::Start(id)).await?,
        Commands::Stop { id } => act(&panel, Action::Stop(id)).await?,
        Commands::Restart { id } => act(&panel, Action::Restart(id)).await?,
        Commands::Run { id } => act(&panel, Action::RunOnce(id)).await?,
        Commands::Remove { id } => act(&panel, Action::Remove(id)).await?,

        Commands::Toggle { id } => {
            load(&panel).await?;
            let rows = panel.rows();
            let Some(toggle) = rows.find(&id).and_then(Row::trigger_toggle).cloned() else {
                bail!("{id} no es una tarea programada conocida");
            };
            act(&panel, toggle).await?;
        }

        Commands::Add { kind, fields } => {
            panel.open_create(kind.into());
            submit(&panel, fields).await?;
        }

        Commands::Edit { id, fields } => {
            load(&panel).await?;
            if !panel.open_edit(&id) {
                return report(&panel);
            }
            submit(&panel, fields).await?;
        }

        Commands::Logs => {
            let logs = remote.list_logs().await?;
            if logs.is_empty() {
                println!("No hay tareas.");
            }
            for entry in logs {
                let state = if entry.has_log { "con log" } else { "sin log" };
                println!(
                    "{}  {:<24} {:<8} {:>10} B  {}",
                    entry.id, entry.name, state, entry.size, entry.mod_time
                );
            }
        }

        Commands::Log { id, lines, bytes } => {
            let query = LogQuery::new(id).lines(lines).bytes(bytes);
            let content = remote.read_log(&query).await?;
            print!("{}", content);
        }

        Commands::Download { id, out } => {
            let out = match out {
                Some(path) => path,
                None => {
                    load(&panel).await?;
                    let name = panel
                        .store()
                        .find(&id)
                        .map(|t| t.name)
                        .unwrap_or_else(|| id.clone());
                    PathBuf::from(format!("{name}_log.txt"))
                }
            };
            let bytes = remote.download_log(&id).await?;
            std::fs::write(&out, &bytes)
                .with_context(|| format!("no se pudo escribir {}", out.display()))?;
            println!("Log guardado en {} ({} bytes)", out.display(), bytes.len());
        }

        Commands::Uptime { follow } => {
            let (heartbeat, mut rx) = Heartbeat::new(remote.clone(), config.heartbeat_every);
            if !follow {
                if !heartbeat.tick().await {
                    bail!("no se pudo leer run-info");
                }
                if let Some(info) = rx.borrow().as_ref() {
                    println!("{}", info.uptime_line());
                }
                return Ok(());
            }

            let _handle = heartbeat.spawn();
            while rx.changed().await.is_ok() {
                if let Some(info) = rx.borrow_and_update().as_ref() {
                    println!("{}", info.uptime_line());
                }
            }
        }

        Commands::Home => {
            println!("{}", remote.home_path().await?);
        }
    }

    Ok(())
}

/// Carga el store; si falla, muestra el aviso y corta.
async fn load<R: Remote>(panel: &Panel<R>) -> Result<()> {
    if !panel.refresh().await {
        return report(panel);
    }
    Ok(())
}

async fn act<R: Remote>(panel: &Panel<R>, action: Action) -> Result<()> {
    panel.dispatch(action).await;
    report(panel)
}

async fn submit<R: Remote>(panel: &Panel<R>, fields: FormArgs) -> Result<()> {
    panel.edit_form(|form| {
        if let Some(name) = fields.name {
            form.name = name;
        }
        if let Some(bin) = fields.bin_path {
            form.bin_path = bin;
        }
        if let Some(dir) = fields.dir {
            form.work_dir = dir;
        }
        if let Some(params) = fields.params {
            form.params_text = params;
        }
        if let Some(spec) = fields.spec {
            form.schedule = spec;
        }
        if let Some(output) = fields.output {
            form.output_type = output.into();
        }
        if let Some(path) = fields.output_path {
            form.output_path = path;
        }
    });

    if let Some(visible) = panel.form_visibility() {
        if !visible.schedule {
            info!("tarea residente: se ignora spec");
        }
        if !visible.output_path {
            info!("salida descartada: se ignora output-path");
        }
    }

    panel.submit_form().await;
    report(panel)
}

/// Imprime el último aviso; error => código de salida distinto de cero.
fn report<R: Remote>(panel: &Panel<R>) -> Result<()> {
    match panel.notice() {
        Some(notice) if notice.is_error() => bail!("{}", notice.text),
        Some(notice) => {
            println!("{}", notice.text);
            Ok(())
        }
        None => Ok(()),
    }
}

fn print_rows(rows: &RowViews) {
    println!("Residentes:");
    if rows.resident.is_empty() {
        println!("  (ninguna)");
    }
    for row in &rows.resident {
        print_row(row);
    }

    println!();
    println!("Programadas:");
    if rows.scheduled.is_empty() {
        println!("  (ninguna)");
    }
    for row in &rows.scheduled {
        print_row(row);
    }
}

fn print_row(row: &Row) {
    let badges: Vec<&str> = row.badges.iter().map(|b| b.label()).collect();
    let actions: Vec<&str> = row.actions.iter().map(Action::label).collect();
    println!(
        "  {:<36} {:<24} [{}]  acciones: {}",
        row.id,
        row.name,
        badges.join(", "),
        actions.join(" / ")
    );
}
