#[tokio::main]
async fn main() {
    if let Err(err) = ordocare::run().await {
        eprintln!("ordocare: {err}");
        std::process::exit(1);
    }
}
