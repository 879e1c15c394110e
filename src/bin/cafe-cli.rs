use clap::{Parser, Subcommand};
use reqwest::Method;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "cafe-cli")]
#[command(about = "Command line client for the frappuccino service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Manage menu items
    Menu {
        #[command(subcommand)]
        action: ItemAction,
    },
    /// Manage inventory items
    Inventory {
        #[command(subcommand)]
        action: ItemAction,
    },
    /// Aggregate reports
    Reports {
        #[command(subcommand)]
        report: Report,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List all orders
    List,
    /// Show one order
    Get { id: String },
    /// Create an order from a JSON payload
    Create { json: String },
    /// Close an open order
    Close { id: String },
    /// Delete an order
    Delete { id: String },
}

#[derive(Subcommand)]
enum ItemAction {
    /// List all items
    List,
    /// Show one item
    Get { id: String },
    /// Create an item from a JSON payload
    Create { json: String },
    /// Delete an item
    Delete { id: String },
}

#[derive(Subcommand)]
enum Report {
    /// Total sales over closed orders
    TotalSales,
    /// Most ordered menu items
    PopularItems,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let (method, path, body) = match cli.command {
        Commands::Orders { action } => match action {
            OrderAction::List => (Method::GET, "/orders".to_string(), None),
            OrderAction::Get { id } => (Method::GET, format!("/orders/{}", id), None),
            OrderAction::Create { json } => (Method::POST, "/orders".to_string(), Some(json)),
            OrderAction::Close { id } => (Method::POST, format!("/orders/{}/close", id), None),
            OrderAction::Delete { id } => (Method::DELETE, format!("/orders/{}", id), None),
        },
        Commands::Menu { action } => item_request("menu", action),
        Commands::Inventory { action } => item_request("inventory", action),
        Commands::Reports { report } => match report {
            Report::TotalSales => (Method::GET, "/reports/total-sales".to_string(), None),
            Report::PopularItems => (Method::GET, "/reports/popular-items".to_string(), None),
        },
    };

    let mut request = client.request(method, format!("{}{}", cli.url, path));
    if let Some(json) = body {
        let payload: Value = serde_json::from_str(&json)?;
        request = request.json(&payload);
    }

    print_response(request.send().await?).await
}

fn item_request(resource: &str, action: ItemAction) -> (Method, String, Option<String>) {
    match action {
        ItemAction::List => (Method::GET, format!("/{}", resource), None),
        ItemAction::Get { id } => (Method::GET, format!("/{}/{}", resource, id), None),
        ItemAction::Create { json } => (Method::POST, format!("/{}", resource), Some(json)),
        ItemAction::Delete { id } => (Method::DELETE, format!("/{}/{}", resource, id), None),
    }
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
