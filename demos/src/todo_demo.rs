use dashwrite::prelude::*;
use dotenv::dotenv;
use std::env;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let endpoint = env::var("DASHWRITE_ENDPOINT").expect("DASHWRITE_ENDPOINT must be set");
    let project_id = env::var("DASHWRITE_PROJECT_ID").expect("DASHWRITE_PROJECT_ID must be set");
    let database_id = env::var("DASHWRITE_DATABASE_ID").expect("DASHWRITE_DATABASE_ID must be set");
    let collection_id =
        env::var("DASHWRITE_COLLECTION_ID").expect("DASHWRITE_COLLECTION_ID must be set");
    let email = env::var("DASHWRITE_EMAIL").expect("DASHWRITE_EMAIL must be set");
    let password = env::var("DASHWRITE_PASSWORD").expect("DASHWRITE_PASSWORD must be set");

    let config =
        AppConfig::new(&endpoint, &project_id)?.with_database(&database_id, &collection_id);
    let client = Dashwrite::new(config);

    println!("Starting todo demo");

    let mut auth = client.auth_flow();
    let (session, _) = auth.login(&email, &password).await?;
    println!("Logged in as: {}", session.provider_uid);

    let mut todos = client.todo_store();

    println!("\nFetching todos");
    let listed = todos.refresh().await?;
    println!("{} todos in the collection", listed.len());

    println!("\nAdding a todo");
    let created = todos.add(&session.provider_uid, "try the rust client").await?;
    println!("Created: {} ({})", created.text, created.id);

    println!("\nEditing it");
    let edited = todos.edit(&created.id, "ship the rust client").await?;
    println!("Now reads: {}", edited.text);

    println!("\nDeleting it");
    todos.remove(&edited.id).await?;
    println!("{} todos left in the cache", todos.list().len());

    Ok(())
}
