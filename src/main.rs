use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::{error, info};

use crypto_trend::app_config::env::parse_list;
use crypto_trend::time_util::mill_time_to_datetime;
use crypto_trend::trading::model::{RunStatus, Timeframe};
use crypto_trend::trading::services::{AnalysisReport, InMemoryResultSink, PriceHistoryFile};
use crypto_trend::{AnalysisConfig, TrendAnalysisJob};

/// 对价格历史文件执行一次趋势分析
#[derive(Parser, Debug)]
#[command(name = "trend-analysis", version, about)]
struct Args {
    /// 价格历史 JSON 文件
    #[arg(short, long)]
    input: PathBuf,

    /// 结果输出文件，不指定时输出到标准输出
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 分析配置 JSON 文件
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 分析周期，逗号分隔，如 24h,7d
    #[arg(short, long)]
    timeframes: Option<String>,
}

async fn run(args: Args) -> Result<RunStatus> {
    let mut config = AnalysisConfig::load(args.config.as_deref())?;
    if let Some(timeframes) = &args.timeframes {
        config.timeframes = parse_list::<Timeframe>(timeframes).map_err(|e| anyhow!(e))?;
        config.validate()?;
    }

    let market_data = Arc::new(PriceHistoryFile::load(&args.input)?.into_market_data());
    let sink = Arc::new(InMemoryResultSink::new());
    let job = TrendAnalysisJob::new(market_data.clone(), market_data, sink.clone(), config);

    let run = job.run().await;
    info!(
        "运行 {} 状态: {} 开始: {}",
        run.id,
        run.status.as_str(),
        mill_time_to_datetime(run.started_at).unwrap_or_default()
    );

    let report = AnalysisReport {
        trends: sink.trends().await,
        signals: sink.signals().await,
        run,
    };
    report.write(args.output.as_deref())?;
    Ok(report.run.status)
}

#[tokio::main]
async fn main() -> ExitCode {
    let _guards = match crypto_trend::app_init() {
        Ok(guards) => guards,
        Err(e) => {
            eprintln!("日志初始化失败: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(Args::parse()).await {
        Ok(RunStatus::Completed) => ExitCode::SUCCESS,
        Ok(status) => {
            error!("分析运行未完成: {}", status.as_str());
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("分析失败: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
