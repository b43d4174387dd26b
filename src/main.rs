use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use lanzadera::config::AppConfig;
use lanzadera::error::AppError;
use lanzadera::telemetry;
use lanzadera::workflows::convocatoria::postulaciones::{
    postulacion_router, ConvocatoriaId, InMemoryPostulacionRepository, PostulacionService,
    TracingNotifier,
};
use lanzadera::workflows::convocatoria::{fixtures, Convocatoria, ConvocatoriaReport};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "lanzadera",
    about = "Run the accelerator convocatoria and evaluation service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Walk the seeded evaluation workflow and print the convocatoria report
    Demo(DemoArgs),
}

const DEFAULT_CONVOCATORIA_ID: &str = "conv-2026-01";
const DEFAULT_NOMBRE: &str = "Convocatoria Aceleración 2026";
const DEFAULT_OPENS_ON: &str = "2026-01-15";
const DEFAULT_CLOSES_ON: &str = "2026-12-15";

#[derive(Args, Debug)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
    /// Convocatoria identifier served by this instance
    #[arg(long, default_value = DEFAULT_CONVOCATORIA_ID)]
    convocatoria_id: String,
    /// Convocatoria display name
    #[arg(long, default_value = DEFAULT_NOMBRE)]
    nombre: String,
    /// Opening date of the postulación window (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date, default_value = DEFAULT_OPENS_ON)]
    opens_on: NaiveDate,
    /// Closing date of the postulación window (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date, default_value = DEFAULT_CLOSES_ON)]
    closes_on: NaiveDate,
}

// A bare invocation runs `serve`; this must hand out the same values the
// clap defaults would, or the served convocatoria opens with an empty id
// and a closed window.
impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            convocatoria_id: DEFAULT_CONVOCATORIA_ID.to_string(),
            nombre: DEFAULT_NOMBRE.to_string(),
            opens_on: parse_date(DEFAULT_OPENS_ON).expect("valid default date"),
            closes_on: parse_date(DEFAULT_CLOSES_ON).expect("valid default date"),
        }
    }
}

#[derive(Args, Debug, Default)]
struct DemoArgs {
    /// Print the ranking as CSV instead of a formatted listing
    #[arg(long)]
    csv: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Demo(args) => run_demo(args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let mut convocatoria = Convocatoria::standard(
        ConvocatoriaId(args.convocatoria_id),
        args.nombre,
        args.opens_on,
        args.closes_on,
    );
    convocatoria.publish()?;

    let repository = Arc::new(InMemoryPostulacionRepository::default());
    let notifier = Arc::new(TracingNotifier);
    let service = Arc::new(PostulacionService::new(
        convocatoria,
        repository,
        notifier,
        config.scoring,
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(postulacion_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "convocatoria service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

struct DemoOutcome {
    report: ConvocatoriaReport,
    notices: usize,
}

fn build_demo_outcome() -> Result<DemoOutcome, AppError> {
    let convocatoria = fixtures::convocatoria_demo();
    let today = fixtures::demo_today();

    let repository = Arc::new(InMemoryPostulacionRepository::default());
    let notifier = Arc::new(CountingNotifier::default());
    let service = PostulacionService::new(
        convocatoria.clone(),
        repository,
        notifier.clone(),
        lanzadera::workflows::convocatoria::postulaciones::ScoringConfig::default(),
    );

    let strong = service.submit(fixtures::sensorgrid(), today)?;
    service.record_ai_scores(
        &strong.postulacion.id,
        fixtures::ai_scores_uniform(&convocatoria, 88.0, 0.9),
    )?;
    service.finalize(&strong.postulacion.id)?;

    let weak = service.submit(fixtures::quickfix_app(), today)?;
    service.record_manual_scores(
        &weak.postulacion.id,
        fixtures::manual_scores_uniform(&convocatoria, 1),
    )?;
    service.finalize(&weak.postulacion.id)?;

    let report = ConvocatoriaReport::build(service.convocatoria(), &service.records()?);
    Ok(DemoOutcome {
        report,
        notices: notifier.count(),
    })
}

fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let outcome = build_demo_outcome()?;

    if args.csv {
        print!("{}", outcome.report.to_csv()?);
        return Ok(());
    }

    println!("Convocatoria: {}", outcome.report.nombre);
    println!("\nEstado de postulaciones");
    for entry in &outcome.report.status_counts {
        println!("- {}: {}", entry.status, entry.count);
    }

    println!("\nMedias por categoría");
    for (category, average) in &outcome.report.category_averages {
        println!("- {}: {:.1}", category.label(), average);
    }

    println!("\nRanking");
    for entry in &outcome.report.ranking {
        println!(
            "- {} | {} | total {:.1} | {}",
            entry.postulacion_id.0, entry.startup, entry.total, entry.recommendation
        );
    }

    println!("\nNotificaciones emitidas: {}", outcome.notices);
    Ok(())
}

#[derive(Default, Clone)]
struct CountingNotifier {
    count: Arc<std::sync::atomic::AtomicUsize>,
}

impl CountingNotifier {
    fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

impl lanzadera::workflows::convocatoria::postulaciones::NotificationPublisher for CountingNotifier {
    fn publish(
        &self,
        notice: lanzadera::workflows::convocatoria::postulaciones::DecisionNotice,
    ) -> Result<(), lanzadera::workflows::convocatoria::postulaciones::NotifyError> {
        self.count.fetch_add(1, Ordering::Relaxed);
        info!(template = %notice.template, postulacion = %notice.postulacion_id.0, "demo notice");
        Ok(())
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_matches_the_serve_defaults() {
        let cli = Cli::parse_from(["lanzadera", "serve"]);
        let parsed = match cli.command {
            Some(Command::Serve(args)) => args,
            other => panic!("expected serve, got {other:?}"),
        };
        let defaults = ServeArgs::default();

        assert_eq!(defaults.convocatoria_id, parsed.convocatoria_id);
        assert_eq!(defaults.nombre, parsed.nombre);
        assert_eq!(defaults.opens_on, parsed.opens_on);
        assert_eq!(defaults.closes_on, parsed.closes_on);
        // The defaulted window accepts postulaciones on the demo date.
        assert!(defaults.opens_on <= fixtures::demo_today());
        assert!(fixtures::demo_today() <= defaults.closes_on);
    }

    #[test]
    fn demo_walkthrough_ranks_strong_over_weak() {
        let outcome = build_demo_outcome().expect("demo workflow completes");

        assert_eq!(outcome.report.ranking.len(), 2);
        assert_eq!(outcome.report.ranking[0].startup, "SensorGrid");
        assert_eq!(outcome.report.ranking[0].recommendation, "aprobado");
        assert_eq!(outcome.report.ranking[1].startup, "QuickFix App");
        assert_eq!(outcome.report.ranking[1].recommendation, "rechazado");
        assert_eq!(outcome.report.ranking[1].total, 25.0);
        assert_eq!(outcome.notices, 2, "both final decisions notify");
    }

    #[test]
    fn demo_csv_renders_header_and_rows() {
        let outcome = build_demo_outcome().expect("demo workflow completes");
        let csv = outcome.report.to_csv().expect("csv renders");

        assert!(csv.starts_with("postulacion_id,startup,total,recomendacion"));
        assert!(csv.contains("SensorGrid"));
        assert!(csv.contains("QuickFix App"));
    }
}
