use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = mill_api::Args::parse();
	mill_api::run(args).await
}
