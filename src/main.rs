#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pharma_feedback_lib::run().await
}
