mod mcp;
mod pipeline;
mod registry;
mod repo_url;
mod server;
mod tarball;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(version, about = "npm Package Documentation MCP Server")]
struct Cli {
    /// Type of server to run
    #[arg(short, long, value_enum, default_value_t = ServerType::Stdio)]
    server_type: ServerType,

    /// Address for the SSE server
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    address: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ServerType {
    /// Start a stdio server
    Stdio,
    /// Start an SSE server
    Sse,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.server_type {
        ServerType::Stdio => {
            server::start_stdio_server().await?;
        }
        ServerType::Sse => {
            println!("Starting SSE server on {}", cli.address);
            server::start_sse_server(&cli.address).await?;
        }
    }

    Ok(())
}
