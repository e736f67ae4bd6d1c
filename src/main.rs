#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    love_letter_server::run().await?;
    Ok(())
}
