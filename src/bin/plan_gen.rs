use anyhow::Result;
use clap::Parser;

use astro_ideator::cli::PlanArgs;
use astro_ideator::generator::workflow::launch_plan_generation;
use astro_ideator::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let args = PlanArgs::parse();
    let (config, request) = args.into_config()?;
    init_tracing(config.verbose);

    launch_plan_generation(&config, &request).await?;
    Ok(())
}
