use async_trait::async_trait;
use folio_contracts::store::{DocumentStore, StoreError, StoreResult};
use folio_core::carousel::{CarouselConfig, CarouselEngine, ManualScheduler, StripLayout};
use folio_core::{FolioError, PortfolioPage};
use folio_model::{ItemId, NewPortfolioRecord, PortfolioItem, ProjectDraft};
use mockall::{Sequence, mock};
use std::sync::Arc;

mock! {
    pub Store {}

    #[async_trait]
    impl DocumentStore for Store {
        async fn list_all(&self) -> StoreResult<Vec<PortfolioItem>>;
        async fn append(&self, record: NewPortfolioRecord) -> StoreResult<PortfolioItem>;
    }
}

fn item(id: &str) -> PortfolioItem {
    PortfolioItem::new(id, format!("Project {id}"), "about", format!("/{id}.png"))
}

fn draft() -> ProjectDraft {
    ProjectDraft {
        name: "Folio".into(),
        image: "https://img.example/folio.png".into(),
        tech: "Rust, tokio".into(),
        url: "https://folio.example".into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn failed_fetch_is_treated_as_empty() {
    let mut store = MockStore::new();
    store
        .expect_list_all()
        .times(1)
        .returning(|| Err(StoreError::Transport("offline".into())));

    let mut page = PortfolioPage::new(store);
    let items = page.load().await;
    assert!(items.is_empty());

    let sched = ManualScheduler::new();
    let mut engine = CarouselEngine::new(CarouselConfig::default(), sched.clone());
    engine.set_items(items);
    engine.attach(Box::new(StripLayout::new(360.0, 280.0, 16.0)));
    assert_eq!(sched.timers_scheduled(), 0);
    assert!(page.view(&engine).cards.is_empty());
}

#[tokio::test]
async fn every_load_produces_a_new_list_identity() {
    let mut store = MockStore::new();
    store
        .expect_list_all()
        .times(2)
        .returning(|| Ok(vec![item("a"), item("b")]));

    let mut page = PortfolioPage::new(store);
    let first = page.load().await;
    let second = page.load().await;
    assert_eq!(first, second);
    assert!(!Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn submit_appends_then_refetches() {
    let mut store = MockStore::new();
    let mut seq = Sequence::new();
    store
        .expect_append()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|record| {
            record.name == "Folio"
                && record.tech == vec!["Rust".to_string(), "tokio".to_string()]
                && record.github.is_empty()
        })
        .returning(|record| Ok(record.into_item(ItemId::new("new-id"))));
    store
        .expect_list_all()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(vec![item("a"), item("new-id")]));

    let mut page = PortfolioPage::new(store);
    let added = page.submit(draft()).await.unwrap();
    assert_eq!(added.id, ItemId::new("new-id"));
    assert_eq!(added.live_link(), Some("https://folio.example"));
    assert_eq!(page.items().len(), 2);
    assert!(!page.is_submitting());
}

#[tokio::test]
async fn invalid_draft_never_reaches_the_store() {
    let mut store = MockStore::new();
    store.expect_append().never();
    store.expect_list_all().never();

    let mut page = PortfolioPage::new(store);
    let err = page
        .submit(ProjectDraft {
            name: "No image".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, FolioError::Draft(_)));
}

#[tokio::test]
async fn append_failure_is_returned_and_list_kept() {
    let mut store = MockStore::new();
    store
        .expect_append()
        .times(1)
        .returning(|_| Err(StoreError::Remote { status: 403, message: "denied".into() }));
    store.expect_list_all().never();

    let mut page = PortfolioPage::new(store);
    let err = page.submit(draft()).await.unwrap_err();
    assert!(matches!(err, FolioError::Store(StoreError::Remote { status: 403, .. })));
    assert!(page.items().is_empty());
    assert!(!page.is_submitting());
}

#[tokio::test]
async fn view_reflects_engine_and_form() {
    let mut store = MockStore::new();
    store.expect_list_all().returning(|| {
        Ok((0..8).map(|i| item(&format!("p{i}"))).collect())
    });

    let mut page = PortfolioPage::new(store);
    let items = page.load().await;
    page.toggle_form();

    let sched = ManualScheduler::new();
    let mut engine = CarouselEngine::new(CarouselConfig::default(), sched.clone());
    engine.set_items(items);
    engine.attach(Box::new(StripLayout::new(300.0, 200.0, 20.0)));
    engine.on_auto_advance(sched.live_timer().unwrap());

    let view = page.view(&engine);
    assert_eq!(view.current_index, Some(1));
    assert_eq!(view.scroll_offset, 220.0);
    assert_eq!(view.cards.len(), 8);
    assert!(view.form.open);
    let visible: Vec<_> = view.cards.iter().map(|c| c.visible).collect();
    // viewport covers items 1..3, plus a two-card buffer each side
    assert_eq!(visible, vec![true, true, true, true, true, false, false, false]);
}

/// Store whose append never completes.
struct StalledStore;

#[async_trait]
impl DocumentStore for StalledStore {
    async fn list_all(&self) -> StoreResult<Vec<PortfolioItem>> {
        Ok(Vec::new())
    }

    async fn append(&self, _record: NewPortfolioRecord) -> StoreResult<PortfolioItem> {
        std::future::pending().await
    }
}

#[tokio::test(start_paused = true)]
async fn abandoned_submit_clears_submitting_flag() {
    let mut page = PortfolioPage::new(StalledStore);

    let outcome =
        tokio::time::timeout(std::time::Duration::from_millis(50), page.submit(draft())).await;
    assert!(outcome.is_err());
    assert!(!page.is_submitting());
    assert!(page.items().is_empty());
}
