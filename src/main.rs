//! k6guard 命令行入口
//! 功能说明：
//! 1. 读取一个或多个脚本文件（未指定文件时读取标准输入）
//! 2. 并发执行静态校验
//! 3. 每个输入输出一行 JSON 结论
//!
//! 退出码：0 全部通过；1 存在未通过的脚本；2 内部错误或参数错误

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use tokio::io::AsyncReadExt;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use k6guard::{
    validate_concurrently, CustomConfigBuilder, ResponseKind, ScriptValidator, ValidationResponse,
    ValidatorConfig,
};

/// 标准输入的来源标识
const STDIN_SOURCE: &str = "<stdin>";

#[derive(Parser, Debug)]
#[command(name = "k6guard")]
#[command(about = "Statically validate k6 load-test scripts without executing them")]
#[command(version)]
struct Cli {
    /// Script files to validate; reads stdin when omitted
    files: Vec<PathBuf>,

    /// Treat each input as a JSON request body: {"script": "..."}
    #[arg(long)]
    json: bool,

    /// Maximum script size in bytes
    #[arg(long)]
    max_size: Option<usize>,

    /// Maximum allowed value of the `vus` option
    #[arg(long)]
    max_vus: Option<u64>,

    /// JSON config file ({"max_script_size": ..., "max_vus": ...})
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// 单个输入：来源标识 + 内容（读取失败时直接给出响应）
struct Input {
    source: String,
    content: Result<String, ValidationResponse>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ k6guard failed: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// 日志输出到标准错误，RUST_LOG 优先
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    // ========== 1. 配置加载 ==========
    let env_config = ValidatorConfig::from_env().context("invalid environment configuration")?;
    let config = resolve_config(&cli, env_config)?;

    // ========== 2. 初始化校验器 ==========
    let validator = ScriptValidator::new(config).context("failed to initialize validator")?;
    debug!("生效配置: {:?}", validator.config());

    // ========== 3. 读取输入（JSON 模式下先解出请求体中的脚本） ==========
    let mut inputs = read_inputs(&cli.files).await?;
    if cli.json {
        inputs = decode_requests(inputs);
    }

    // ========== 4. 并发校验 ==========
    let responses = validate_inputs(&validator, &inputs).await;

    // ========== 5. 输出结论 ==========
    let mut saw_invalid = false;
    let mut saw_server_error = false;
    for (input, response) in inputs.iter().zip(&responses) {
        let line = json!({
            "source": input.source,
            "status": response.http_status(),
            "result": response,
        });
        println!("{}", line);

        match response.kind() {
            ResponseKind::Success => {}
            ResponseKind::ServerError => saw_server_error = true,
            _ => saw_invalid = true,
        }
    }

    let exit_code = if saw_server_error {
        ExitCode::from(2)
    } else if saw_invalid {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    };
    Ok(exit_code)
}

/// 配置优先级：命令行参数 > 配置文件 > 环境变量 > 默认值
/// `env_config` 已包含环境变量与默认值
fn resolve_config(cli: &Cli, env_config: ValidatorConfig) -> anyhow::Result<ValidatorConfig> {
    let base = match &cli.config {
        Some(path) => env_config
            .overlay_json_file(path)
            .with_context(|| format!("failed to load config file {}", path.display()))?,
        None => env_config,
    };

    let mut builder = CustomConfigBuilder::from_config(base);
    if let Some(size) = cli.max_size {
        builder = builder.max_script_size(size);
    }
    if let Some(vus) = cli.max_vus {
        builder = builder.max_vus(vus);
    }
    Ok(builder.build()?)
}

async fn read_inputs(files: &[PathBuf]) -> anyhow::Result<Vec<Input>> {
    if files.is_empty() {
        let mut content = String::new();
        tokio::io::stdin()
            .read_to_string(&mut content)
            .await
            .context("failed to read script from stdin")?;
        return Ok(vec![Input {
            source: STDIN_SOURCE.to_string(),
            content: Ok(content),
        }]);
    }

    let mut inputs = Vec::with_capacity(files.len());
    for path in files {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            ValidationResponse::invalid_request(format!("Cannot read {}: {}", path.display(), e))
        });
        inputs.push(Input {
            source: path.display().to_string(),
            content,
        });
    }
    Ok(inputs)
}

/// 把每个请求体替换为其中的脚本，不合法的请求体直接转为错误响应
fn decode_requests(inputs: Vec<Input>) -> Vec<Input> {
    inputs
        .into_iter()
        .map(|input| Input {
            source: input.source,
            content: input
                .content
                .and_then(|body| ScriptValidator::decode_request(&body)),
        })
        .collect()
}

/// 可读取的输入并发校验，读取失败的输入保留其错误响应，顺序与输入一致
async fn validate_inputs(validator: &ScriptValidator, inputs: &[Input]) -> Vec<ValidationResponse> {
    let scripts: Vec<String> = inputs
        .iter()
        .filter_map(|input| input.content.as_ref().ok().cloned())
        .collect();
    let mut validated = validate_concurrently(validator, scripts).await.into_iter();

    inputs
        .iter()
        .map(|input| match &input.content {
            Ok(_) => validated
                .next()
                .unwrap_or_else(|| ValidationResponse::server_error("missing validation result")),
            Err(response) => response.clone(),
        })
        .collect()
}
