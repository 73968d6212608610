use clap::{Parser, Subcommand};
use snippet_exec::{CodeExecutor, ExecutorConfig};
use snippet_exec_server::{create_app, load_config, run_server};
use std::{
    io::Read,
    net::SocketAddr,
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with executor settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory under which per-execution workspaces are created
    #[arg(long, global = true)]
    work_dir: Option<PathBuf>,

    /// Timeout in seconds for each compile or run stage
    #[arg(short, long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API
    Serve {
        /// Server address to listen on
        #[arg(short, long, default_value = "0.0.0.0:3000")]
        addr: SocketAddr,

        /// Maximum number of concurrent executions
        #[arg(short, long, default_value = "10")]
        max_concurrent: usize,
    },
    /// Execute one snippet read from FILE, or stdin
    Run {
        #[arg(short, long)]
        language: String,

        file: Option<PathBuf>,
    },
    /// Execute every tagged fenced block of a markdown document
    Blocks { file: Option<PathBuf> },
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    let mut input = String::new();
    match file {
        Some(path) => input = std::fs::read_to_string(path)?,
        None => {
            std::io::stdin().read_to_string(&mut input)?;
        }
    }
    Ok(input)
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing; stdout is reserved for JSON results
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config: ExecutorConfig = load_config(args.config.as_deref(), args.work_dir, args.timeout)?;

    match args.command {
        Command::Serve {
            addr,
            max_concurrent,
        } => {
            let app = create_app(max_concurrent, config)?;
            run_server(app, addr).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Run { language, file } => {
            let code = read_input(file.as_deref())?;
            let executor = CodeExecutor::new(config)?;
            let result = executor.execute(&code, &language).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(exit_code(result.success))
        }
        Command::Blocks { file } => {
            let markdown = read_input(file.as_deref())?;
            let executor = CodeExecutor::new(config)?;
            let results = executor.execute_blocks(&markdown).await;
            println!("{}", serde_json::to_string_pretty(&results)?);
            Ok(exit_code(results.iter().all(|block| block.result.success)))
        }
    }
}
