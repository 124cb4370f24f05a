#[tokio::main]
async fn main() {
    procurement_client::run().await;
}
