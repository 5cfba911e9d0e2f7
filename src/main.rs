use anyhow::Context;
use clap::Parser;

use restaurant_db::{
    cli::{Cli, Commands, OutputArgs, OutputFormat},
    config::{AppConfig, defaults::DEFAULT_RUST_LOG, endpoints},
    db::{ReportKind, ReportSet, RestaurantDb, SeedData, default_registry},
    logging::init_tracing,
    render,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("restaurant_db failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            init_tracing(DEFAULT_RUST_LOG);
            return Err(err);
        }
    };
    init_tracing(&cfg.logging.rust_log);
    if let Some(url) = cli.database_url {
        cfg.database.url = Some(url);
    }

    let candidates = endpoints::resolve(&cfg.database, |key| std::env::var(key).ok())?;
    let providers = default_registry()?;
    let db = RestaurantDb::open(&providers, &cfg.database, &candidates).await?;

    let outcome = execute(&db, cli.command).await;
    db.close().await.context("failed to close database session")?;
    outcome
}

async fn execute(db: &RestaurantDb, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Run(args) => {
            if args.reset {
                db.drop_all().await?;
            }
            db.create_all().await?;
            db.seed(&SeedData::sample()).await?;
            let set = db.reports().run_all(&args.output.report_options()).await?;
            print_reports(&set, &args.output)
        }
        Commands::Create => Ok(db.create_all().await?),
        Commands::Drop => Ok(db.drop_all().await?),
        Commands::Seed => {
            let summary = db.seed(&SeedData::sample()).await?;
            println!("inserted {} rows", summary.total());
            Ok(())
        }
        Commands::Report(args) => {
            let mut set = ReportSet::default();
            db.reports()
                .run(
                    ReportKind::from(args.report),
                    &args.output.report_options(),
                    &mut set,
                )
                .await?;
            print_reports(&set, &args.output)
        }
    }
}

fn print_reports(set: &ReportSet, output: &OutputArgs) -> anyhow::Result<()> {
    match output.format {
        OutputFormat::Text => println!("{}", render::text(set, &output.customer)),
        OutputFormat::Json => {
            println!("{}", render::json(set).context("failed to serialize reports")?)
        }
    }
    Ok(())
}
