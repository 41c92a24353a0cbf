//! Render-ready description of the portfolio strip.

use folio_model::PortfolioItem;
use serde::Serialize;

use crate::carousel::{CarouselEngine, ModeKind, Scheduler};

/// Where a link action opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkTarget {
    /// New tab / window.
    NewContext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    Live,
    Source,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkAction {
    pub kind: LinkKind,
    pub label: &'static str,
    pub url: String,
    pub target: LinkTarget,
}

impl LinkAction {
    fn live(url: &str) -> Self {
        Self {
            kind: LinkKind::Live,
            label: "Live",
            url: url.to_string(),
            target: LinkTarget::NewContext,
        }
    }

    fn source(url: &str) -> Self {
        Self {
            kind: LinkKind::Source,
            label: "GitHub",
            url: url.to_string(),
            target: LinkTarget::NewContext,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub tech: Vec<String>,
    pub actions: Vec<LinkAction>,
    pub visible: bool,
}

impl CardView {
    pub fn from_item(item: &PortfolioItem, visible: bool) -> Self {
        let actions = item
            .live_link()
            .map(LinkAction::live)
            .into_iter()
            .chain(item.source_link().map(LinkAction::source))
            .collect();
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            description: item.description.clone(),
            image: item.image.clone(),
            tech: item.tech.clone(),
            actions,
            visible,
        }
    }
}

/// Open/closed state of the add-project form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FormToggle {
    pub open: bool,
}

impl FormToggle {
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn label(&self) -> &'static str {
        if self.open {
            "Close Form"
        } else {
            "Add New Project"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselView {
    pub scroll_offset: f32,
    pub current_index: Option<usize>,
    pub mode: ModeKind,
    pub cards: Vec<CardView>,
    pub form: FormToggle,
}

impl CarouselView {
    pub fn build<S: Scheduler>(
        engine: &CarouselEngine<S>,
        form: FormToggle,
    ) -> Self {
        let items = engine.items();
        let visible = engine
            .surface()
            .and_then(|s| s.visible_range())
            .unwrap_or(0..items.len());
        let cards = items
            .iter()
            .enumerate()
            .map(|(i, item)| CardView::from_item(item, visible.contains(&i)))
            .collect();

        Self {
            scroll_offset: engine.scroll_offset().unwrap_or(0.0),
            current_index: engine.current_index(),
            mode: engine.mode().kind(),
            cards,
            form,
        }
    }
}
