//! Output-type classification command

use sitegen_sdk::SitegenClient;

pub async fn run(client: &SitegenClient, prompt: &str) -> anyhow::Result<()> {
    let output_type = client.classify(prompt).await;
    println!("{}", output_type);
    Ok(())
}
