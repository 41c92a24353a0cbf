use anyhow::Result;
use folio_config::FolioConfig;

use super::open_page;

pub async fn list(config: &FolioConfig, json: bool) -> Result<()> {
    let mut page = open_page(config)?;
    let items = page.load().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&*items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("no projects");
        return Ok(());
    }
    for item in items.iter() {
        println!(
            "{}\t{}\t{}\t{}",
            item.id,
            item.name,
            item.live_link().unwrap_or("-"),
            item.source_link().unwrap_or("-"),
        );
    }
    Ok(())
}
