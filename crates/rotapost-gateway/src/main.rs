#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rotapost_gateway::run().await
}
