// ==========================================
// SNAC 数据上传工具 - 命令行入口
// ==========================================
// 子命令: model / migrate / preview / export-json / validate / upload / batches
// 运行时: tokio；Ctrl-C 在当前记录完成后停止批量处理
// ==========================================

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use snac_uploader::config::UploaderConfig;
use snac_uploader::domain::ModelType;
use snac_uploader::engine::{BatchReport, CancellationFlag, SchemaEvaluator, UploadOrchestrator};
use snac_uploader::exporter::SnacSession;
use snac_uploader::importer::{Table, UniversalFileParser};
use snac_uploader::model::{ConstellationModel, RelationModel, ResourceModel, SnacSchema};
use snac_uploader::repository::OutcomeRepository;
use snac_uploader::{logging, HttpSnacClient};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "snac-uploader")]
#[command(
    author,
    version,
    about = "Map spreadsheet rows to SNAC constellations, resources and relations, then validate and upload them"
)]
struct Cli {
    /// Config file (defaults to $SNAC_UPLOADER_CONFIG or the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SNAC environment id, overriding the config (e.g. dev, prod)
    #[arg(long, global = true)]
    environment: Option<String>,

    /// Emit JSON log lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the field model JSON for a schema type (constellation, resource, relation)
    Model { model_type: String },

    /// Rewrite deprecated field names in a schema file
    Migrate {
        schema: PathBuf,

        /// Write the migrated schema here instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render HTML previews of the first records (no remote calls)
    Preview {
        schema: PathBuf,
        table: PathBuf,

        /// Number of records to preview (defaults to max_preview_records)
        #[arg(long)]
        max: Option<usize>,
    },

    /// Export every record as SNAC JSON (no remote calls)
    ExportJson {
        schema: PathBuf,
        table: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate every record against SNAC without uploading
    Validate {
        schema: PathBuf,
        table: PathBuf,

        /// Write the table plus outcome columns to this CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate and upload every record
    Upload {
        schema: PathBuf,
        table: PathBuf,

        /// Write the table plus outcome columns to this CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List upload batches recorded in the outcome ledger
    Batches,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        logging::init_json();
    } else {
        logging::init();
    }

    info!(version = snac_uploader::VERSION, "{}", snac_uploader::APP_NAME);

    let mut config = UploaderConfig::load(cli.config.as_deref()).context("加载配置失败")?;
    if let Some(environment) = cli.environment {
        config.environment = environment;
    }

    match cli.command {
        Commands::Model { model_type } => print_model(&model_type),
        Commands::Migrate { schema, output } => migrate_schema(&schema, output.as_deref()),
        Commands::Preview { schema, table, max } => {
            let max = max.unwrap_or(config.max_preview_records);
            preview(&config, &schema, &table, max).await
        }
        Commands::ExportJson {
            schema,
            table,
            output,
        } => export_json(&config, &schema, &table, output.as_deref()).await,
        Commands::Validate {
            schema,
            table,
            output,
        } => run_batch(&config, &schema, &table, output.as_deref(), false).await,
        Commands::Upload {
            schema,
            table,
            output,
        } => run_batch(&config, &schema, &table, output.as_deref(), true).await,
        Commands::Batches => list_batches(&config),
    }
}

// ==========================================
// 子命令实现
// ==========================================

fn print_model(model_type: &str) -> anyhow::Result<()> {
    let model_type: ModelType = model_type
        .parse()
        .map_err(|t| anyhow!("unrecognized SNAC schema type: [{}]", t))?;

    let json = match model_type {
        ModelType::Constellation => ConstellationModel::new().to_json(),
        ModelType::Resource => ResourceModel::new().to_json(),
        ModelType::Relation => RelationModel::new().to_json(),
    };

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn migrate_schema(path: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let mut schema = SnacSchema::load(path)?;
    let renames = schema.migrate()?;

    for rename in &renames {
        println!(
            "column [{}]: [{}] -> [{}]",
            rename.column, rename.from, rename.to
        );
    }
    if renames.is_empty() {
        println!("schema is up to date");
    }

    match output {
        Some(out) => schema.save(out)?,
        None => println!("{}", serde_json::to_string_pretty(&schema)?),
    }
    Ok(())
}

async fn preview(
    config: &UploaderConfig,
    schema: &Path,
    table: &Path,
    max: usize,
) -> anyhow::Result<()> {
    let (session, table) = open_session(config, schema, table)?;
    let evaluator = SchemaEvaluator::new(session);

    let items = evaluator.evaluate_records(table, Some(max)).await?;
    for item in &items {
        println!("<!-- record at row {} -->", item.row_index() + 1);
        println!("{}", item.preview_text());
    }

    info!(records = items.len(), "预览完成");
    Ok(())
}

async fn export_json(
    config: &UploaderConfig,
    schema: &Path,
    table: &Path,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let (session, table) = open_session(config, schema, table)?;
    let json = SchemaEvaluator::new(session).export_json(table).await?;
    let text = serde_json::to_string_pretty(&json)?;

    match output {
        Some(out) => {
            std::fs::write(out, text).with_context(|| format!("写出失败: {}", out.display()))?;
            info!(path = %out.display(), "JSON 已导出");
        }
        None => println!("{}", text),
    }
    Ok(())
}

async fn run_batch(
    config: &UploaderConfig,
    schema: &Path,
    table_path: &Path,
    output: Option<&Path>,
    upload: bool,
) -> anyhow::Result<()> {
    let (session, table) = open_session(config, schema, table_path)?;
    let environment = session.environment.clone();

    let items = SchemaEvaluator::new(session)
        .evaluate_records(table.clone(), None)
        .await?;

    let cancel = CancellationFlag::new();
    let flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("收到中断信号，当前记录完成后停止");
            flag.cancel();
        }
    });

    let orchestrator = UploadOrchestrator::new(environment.clone(), config.include_api_response)
        .with_progress(Arc::new(|done, total| {
            info!(done, total, percent = done * 100 / total.max(1), "进度");
        }));

    let report = if upload {
        orchestrator.upload_batch(&items, &cancel).await
    } else {
        orchestrator.validate_batch(&items, &cancel).await
    };

    if upload && !report.outcomes.is_empty() {
        let repo = OutcomeRepository::open(&config.ledger_path())?;
        let batch_id = OutcomeRepository::new_batch_id();
        repo.batch_insert(&batch_id, &environment.id, &report.outcomes)?;
        info!(batch_id = %batch_id, "结果已写入台账");
    }

    if let Some(out) = output {
        write_outcomes(&orchestrator, &table, &report, out)?;
    }

    print_summary(&report);
    Ok(())
}

fn write_outcomes(
    orchestrator: &UploadOrchestrator,
    table: &Table,
    report: &BatchReport,
    out: &Path,
) -> anyhow::Result<()> {
    if report.cancelled {
        warn!("批量处理已取消，不生成结果列");
        return Ok(());
    }

    let mut table = table.clone();
    let columns = orchestrator.apply_outcome_columns(&mut table, report)?;
    table.write_csv(out)?;

    info!(path = %out.display(), columns = columns.len(), "结果表已写出");
    Ok(())
}

fn print_summary(report: &BatchReport) {
    println!(
        "{} of {} records processed: {} succeeded, {} failed{}",
        report.outcomes.len(),
        report.total,
        report.succeeded(),
        report.failed(),
        if report.cancelled { " (cancelled)" } else { "" }
    );

    for outcome in report.outcomes.iter().filter(|o| !o.is_success()) {
        println!("row {}: [{}] {}", outcome.row_index + 1, outcome.result, outcome.message);
    }
}

fn list_batches(config: &UploaderConfig) -> anyhow::Result<()> {
    let repo = OutcomeRepository::open(&config.ledger_path())?;

    for batch in repo.list_batches()? {
        println!(
            "{}  {}  {}  {}/{} succeeded",
            batch.recorded_at, batch.environment, batch.batch_id, batch.succeeded, batch.total
        );
    }
    Ok(())
}

// ==========================================
// 辅助函数
// ==========================================

/// 加载 schema（自动迁移历史字段名）与表格，创建会话
fn open_session(
    config: &UploaderConfig,
    schema_path: &Path,
    table_path: &Path,
) -> anyhow::Result<(Arc<SnacSession>, Arc<Table>)> {
    let mut schema = SnacSchema::load(schema_path)
        .with_context(|| format!("加载 schema 失败: {}", schema_path.display()))?;

    let renames = schema.migrate()?;
    if !renames.is_empty() {
        warn!(renamed = renames.len(), "schema 含历史字段名，已在内存中迁移");
    }

    let table = UniversalFileParser
        .parse(table_path)
        .with_context(|| format!("读取表格失败: {}", table_path.display()))?;

    let environment = config.current_environment()?;
    let timeout = config.request_timeout_secs.map(Duration::from_secs);
    let client = HttpSnacClient::new(environment.clone(), timeout)?;

    info!(
        environment = %environment.name,
        schema_type = %schema.schema_type,
        rows = table.row_count(),
        "会话已创建"
    );

    let session = SnacSession::new(environment, Arc::new(client), schema);
    Ok((Arc::new(session), Arc::new(table)))
}
