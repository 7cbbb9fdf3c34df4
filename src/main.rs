#[tokio::main]
async fn main() -> anyhow::Result<()> {
    oratio_lib::run().await
}
