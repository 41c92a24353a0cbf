use anyhow::Result;
use folio_config::{ConfigLoad, ConfigSource};

pub fn check(load: &ConfigLoad) -> Result<()> {
    let config = &load.config;
    let source = match &config.metadata.source {
        ConfigSource::Default => "defaults".to_string(),
        ConfigSource::EnvInline => "FOLIO_CONFIG_JSON".to_string(),
        other => other
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
    };
    println!("config: {source}");
    println!("store: {}", config.store.kind());
    println!(
        "carousel: every {}ms, gain {}, decay {}, stop below {}",
        config.carousel.auto_advance_ms,
        config.carousel.drag_gain,
        config.carousel.decay,
        config.carousel.min_velocity,
    );

    for warning in &load.warnings.items {
        match &warning.hint {
            Some(hint) => println!("warning: {} ({hint})", warning.message),
            None => println!("warning: {}", warning.message),
        }
    }
    println!("ok");
    Ok(())
}
