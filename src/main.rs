#[tokio::main]
async fn main() -> anyhow::Result<()> {
    transactions_api::cli::run_with_sys_args().await
}
