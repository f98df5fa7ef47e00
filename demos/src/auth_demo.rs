use dashwrite::prelude::*;
use dotenv::dotenv;
use std::env;
use uuid::Uuid;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let endpoint = env::var("DASHWRITE_ENDPOINT").expect("DASHWRITE_ENDPOINT must be set");
    let project_id = env::var("DASHWRITE_PROJECT_ID").expect("DASHWRITE_PROJECT_ID must be set");
    let verify_url = env::var("DASHWRITE_VERIFY_URL")
        .unwrap_or_else(|_| "http://localhost:5173/verify-email".to_string());

    let config = AppConfig::new(&endpoint, &project_id)?.with_verification_url(&verify_url);
    let client = Dashwrite::new(config);

    println!("Starting auth demo");

    // Generate a unique email for testing
    let unique_id = Uuid::new_v4().to_string();
    let test_email = format!("demo-user-{}@example.com", unique_id);
    let test_password = "securePassword123!";

    let mut auth = client.auth_flow();

    println!("Registering a new user with email: {}", test_email);
    let session = auth
        .register("Demo User", &test_email, test_password)
        .await?;
    println!("Registered, session id: {}", session.id);
    println!("Form says: {:?}", auth.form().message());

    // Verify the gate passes with the fresh session
    let gate = client.session_gate();
    match gate.dashboard_entry().await {
        Ok(session) => println!("Gate passed for: {}", session.provider_uid),
        Err(route) => println!("Gate redirected to: {:?}", route),
    }

    println!("\nLogging out");
    let route = auth.logout().await?;
    println!("Routed to: {:?}", route);

    println!("\nLogging back in");
    let (session, route) = auth.login(&test_email, test_password).await?;
    println!("Session for {} routed to {:?}", session.provider_uid, route);

    Ok(())
}
