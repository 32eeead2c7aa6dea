use anyhow::Result;
use tracing::error;

use mcq_generator::error::AppError;
use mcq_generator::utils::logging;
use mcq_generator::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置（缺少 API key 属于启动期致命错误）
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("配置加载失败: {}", e);
            std::process::exit(2);
        }
    };

    // 初始化日志
    logging::init(config.verbose_logging);

    // 解析命令行参数: <主题> <子主题> <数量>
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        eprintln!("用法: {} <topic> <sub_topic> <count>", args[0]);
        std::process::exit(2);
    }
    let topic = &args[1];
    let sub_topic = &args[2];
    let count: usize = match args[3].parse() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("题目数量必须是正整数: {}", args[3]);
            std::process::exit(2);
        }
    };

    // 初始化应用并探测 API 连通性（失败只警告，不中止）
    let app = App::initialize(config)?;
    app.test_api_connection().await;

    // 执行生成
    match app.generate(topic, sub_topic, count).await {
        Ok(questions) => {
            let envelope = serde_json::json!({ "questions": questions });
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            Ok(())
        }
        Err(e @ AppError::Request(_)) => {
            error!("❌ 请求参数非法: {}", e);
            std::process::exit(2);
        }
        Err(e) => {
            error!("❌ 生成失败: {}", e);
            std::process::exit(1);
        }
    }
}
