//! Development reset: drops every table and recreates the schema.

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = rolsa::config::Config::load()?;
    rolsa::app::init_tracing(&cfg.basic.loglevel);

    rolsa::app::reset_database(&cfg).await?;
    println!("{}", rolsa::app::RESET_CONFIRMATION);
    Ok(())
}
