use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "cascade-cli")]
#[command(about = "Query a running forecast cascade tier", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:5001")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch forecast records (converter or synthesizer tier)
    Forecast,
    /// Fetch the category set (catalog tier)
    Categories,
    /// List circuit breaker states
    Breakers,
    /// Check tier status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let path = match cli.command {
        Commands::Forecast | Commands::Categories => "/weatherforecast",
        Commands::Breakers => "/admin/breakers",
        Commands::Status => "/admin/status",
    };

    let res = client.get(format!("{base}{path}")).send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: tier returned status {}", status);
        let text = res.text().await.unwrap_or_default();
        match serde_json::from_str::<Value>(&text) {
            Ok(body) => {
                if let Some(kind) = body.get("kind").and_then(Value::as_str) {
                    eprintln!("Kind: {kind}");
                }
                if let Some(message) = body.get("message").and_then(Value::as_str) {
                    eprintln!("Message: {message}");
                }
            }
            Err(_) if !text.is_empty() => eprintln!("Response: {}", text),
            Err(_) => {}
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
