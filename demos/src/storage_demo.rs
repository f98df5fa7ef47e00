use bytes::Bytes;
use dashwrite::files::Selection;
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
    let bucket_id = env::var("DASHWRITE_BUCKET_ID").expect("DASHWRITE_BUCKET_ID must be set");
    let email = env::var("DASHWRITE_EMAIL").expect("DASHWRITE_EMAIL must be set");
    let password = env::var("DASHWRITE_PASSWORD").expect("DASHWRITE_PASSWORD must be set");

    let config = AppConfig::new(&endpoint, &project_id)?.with_bucket(&bucket_id);
    let client = Dashwrite::new(config);

    println!("Starting storage demo");

    let mut auth = client.auth_flow();
    auth.login(&email, &password).await?;

    let mut files = client.file_store();

    println!("\nUploading a small text file");
    let uploaded = files
        .upload(Some(Selection {
            file_name: "hello.txt".to_string(),
            bytes: Bytes::from_static(b"hello from the dashwrite demo"),
        }))
        .await?;
    println!("Uploaded: {} ({} bytes)", uploaded.name, uploaded.size_bytes);

    println!("\nBucket contents:");
    for file in files.list() {
        println!("  {} - {} ({} bytes)", file.id, file.name, file.size_bytes);
    }

    let handle = files.download_handle(&uploaded.id)?;
    println!("\nDownload link: {}", handle);

    println!("\nDeleting it again");
    files.remove(&uploaded.id).await?;
    println!("{} files left", files.list().len());

    Ok(())
}
