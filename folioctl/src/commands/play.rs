use anyhow::Result;
use clap::Args;
use folio_config::FolioConfig;
use folio_core::carousel::{CarouselMessage, CarouselRuntime};
use folio_model::PortfolioItem;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::info;

use super::open_page;

#[derive(Debug, Args)]
pub struct PlayArgs {
    /// How long to run, e.g. `10s` or `1m`
    #[arg(long, default_value = "10s", value_parser = humantime::parse_duration)]
    duration: Duration,
    /// How often to log the carousel state
    #[arg(long, default_value = "500ms", value_parser = humantime::parse_duration)]
    sample: Duration,
    /// Viewport width; overrides layout.viewport_width
    #[arg(long)]
    viewport: Option<f32>,
    /// Use N placeholder projects instead of the configured store
    #[arg(long)]
    demo: Option<usize>,
    /// Pointer x where a simulated drag starts
    #[arg(long, requires = "drag_to", allow_hyphen_values = true)]
    drag_from: Option<f32>,
    /// Pointer x where the simulated drag is released
    #[arg(long, requires = "drag_from", allow_hyphen_values = true)]
    drag_to: Option<f32>,
}

fn demo_items(count: usize) -> Arc<[PortfolioItem]> {
    (0..count)
        .map(|i| {
            PortfolioItem::new(
                format!("demo-{i}"),
                format!("Demo project {}", i + 1),
                "",
                format!("/images/demo-{i}.png"),
            )
        })
        .collect::<Vec<_>>()
        .into()
}

pub async fn play(config: &FolioConfig, args: PlayArgs) -> Result<()> {
    let items = match args.demo {
        Some(count) => demo_items(count),
        None => open_page(config)?.load().await,
    };

    let mut layout = config.layout;
    if let Some(width) = args.viewport {
        layout.viewport_width = width;
    }
    info!(
        items = items.len(),
        viewport = layout.viewport_width,
        "starting carousel"
    );
    let runtime =
        CarouselRuntime::spawn(config.carousel, items, Box::new(layout.strip()));

    if let (Some(from), Some(to)) = (args.drag_from, args.drag_to) {
        runtime.send(CarouselMessage::PointerDown { x: from })?;
        runtime.send(CarouselMessage::PointerMove { x: to })?;
        runtime.send(CarouselMessage::PointerUp)?;
    }

    let deadline = Instant::now() + args.duration;
    let mut ticks = interval(args.sample.max(Duration::from_millis(1)));
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    while Instant::now() < deadline {
        ticks.tick().await;
        let snap = runtime.snapshot();
        info!(
            index = ?snap.current_index,
            offset = snap.scroll_offset,
            mode = ?snap.mode,
            velocity = snap.velocity,
            "carousel"
        );
    }

    let last = runtime.snapshot();
    runtime.shutdown().await?;
    println!("{}", serde_json::to_string(&last)?);
    Ok(())
}
