mod collectors;
mod config;
mod dingtalk;
mod netaddr;
mod report;
mod virt;

use clap::Parser;
use collectors::system::collect_host;
use config::Config;
use dingtalk::Notifier;
use sysinfo::{System, SystemExt};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use virt::SystemInspector;

#[derive(Parser, Debug)]
#[command(name = "dingstatus")]
#[command(version)]
struct Cli {
    /// Print the rendered report to stdout instead of dispatching it.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!(error = %err, "failed to load configuration");
            std::process::exit(1);
        }
    };

    let inspector = SystemInspector;
    let mut system = System::new_all();
    let mut snapshot = collect_host(&mut system, &inspector).await;
    snapshot.virtualization = virt::detect(&inspector);
    snapshot.private_ipv4 = netaddr::first_private_ipv4();
    info!(
        host = %snapshot.host_name,
        virtualization = %snapshot.virtualization,
        cpu_percent = snapshot.cpu_usage_percent,
        "snapshot collected"
    );

    let text = report::render(&snapshot, &cfg);
    if cli.dry_run {
        println!("{text}");
        return;
    }

    let notifier = Notifier::new(cfg.webhook.clone(), cfg.secret.clone());
    if let Err(err) = notifier.send_markdown(&cfg.title, &text).await {
        error!(error = %err, "webhook dispatch failed");
        std::process::exit(1);
    }
    info!("report dispatched");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
