use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;

use homework_portal::utils::logging;
use homework_portal::{App, Config};

/// 教师作业门户命令行
#[derive(Debug, Parser)]
#[command(name = "homework-portal", version, about)]
struct Cli {
    /// TOML 配置文件路径，不指定时从环境变量读取
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 当前所在路由（决定启动流程是否跳转）
    #[arg(long, global = true, default_value = "/")]
    route: String,

    /// 登录邮箱
    #[arg(long, global = true, env = "PORTAL_EMAIL")]
    email: Option<String>,

    /// 登录密码
    #[arg(long, global = true, env = "PORTAL_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 执行启动流程并输出导航菜单
    Menu,
    /// 读取本地图片，生成作业组
    Scan {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// 查看当前用户资料
    Whoami,
    /// 查看教师资料和班级
    Teacher,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置（缺少必填项时直接退出）
    let config = match &cli.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::from_env()?,
    };

    // 初始化日志
    logging::init(cli.verbose || config.verbose_logging);

    // 初始化应用
    let app = App::initialize(config).await?;

    let shutdown = app.shutdown_token().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("⚠️ 收到中断信号，取消进行中的操作");
            shutdown.cancel();
        }
    });

    let credentials = cli.email.clone().zip(cli.password.clone());
    let result = run(&app, &cli, credentials).await;

    app.shutdown().await;
    result
}

async fn run(app: &App, cli: &Cli, credentials: Option<(String, String)>) -> Result<()> {
    app.sign_in_if_needed(credentials).await?;

    match &cli.command {
        Command::Menu => {
            app.show_menu(&cli.route).await?;
        }
        Command::Scan { files } => {
            app.scan(files).await?;
        }
        Command::Whoami => app.whoami().await?,
        Command::Teacher => {
            app.teacher().await?;
        }
    }
    Ok(())
}
