use anyhow::Result;
use clap::Parser;

use astro_ideator::cli::IdeaArgs;
use astro_ideator::generator::workflow::launch_idea_generation;
use astro_ideator::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let args = IdeaArgs::parse();
    let debug = args.debug;
    let (config, request) = args.into_config()?;
    init_tracing(config.verbose);

    match launch_idea_generation(&config, &request).await {
        Ok(_) => Ok(()),
        Err(e) if debug => Err(e),
        Err(e) => {
            tracing::error!(error = %e, "idea generation failed");
            eprintln!("❌ 想法生成出错: {}", e);
            std::process::exit(1);
        }
    }
}
