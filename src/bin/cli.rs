use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    taskport::cli::run().await
}
