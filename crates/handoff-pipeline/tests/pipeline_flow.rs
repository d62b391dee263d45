use std::sync::{Arc, Mutex};
use std::time::Duration;

use handoff_pipeline::{Item, PassThroughStage, Pipeline, PipelineError, Stage, TimingStage};

fn pass_through_pipeline<T: Send + 'static>(len: usize) -> Pipeline<T> {
    let stages = (0..len)
        .map(|_| Arc::new(PassThroughStage) as Arc<dyn Stage<T>>)
        .collect();
    Pipeline::new(stages)
}

#[tokio::test]
async fn three_pass_through_stages_deliver_payload() {
    let (input, output) = pass_through_pipeline::<String>(3).split();

    tokio::spawn(async move {
        input.submit(Item::new("foo".to_string())).await.unwrap();
        input.close();
    });

    let mut last = None;
    output.drain(|item| last = Some(item.payload)).await;
    assert_eq!(last.as_deref(), Some("foo"));
}

#[tokio::test]
async fn empty_pipeline_returns_item_unchanged() {
    let mut drained = Vec::new();
    let summary = pass_through_pipeline::<&str>(0)
        .run(vec![Item::new("x")], |item| drained.push(item.payload))
        .await;

    assert_eq!(drained, vec!["x"]);
    assert_eq!(summary.items, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn long_chain_keeps_order_on_multi_thread_runtime() {
    let items: Vec<Item<usize>> = (0..1_000).map(Item::new).collect();

    let mut drained = Vec::with_capacity(1_000);
    pass_through_pipeline(16)
        .run(items, |item| drained.push(item.payload))
        .await;

    assert_eq!(drained, (0..1_000).collect::<Vec<_>>());
}

#[tokio::test]
async fn timing_stage_reports_once_per_item() {
    let reports = Arc::new(Mutex::new(Vec::new()));
    let recorded = reports.clone();

    let pipeline: Pipeline<&str> = Pipeline::builder()
        .add_stage(TimingStage::new(PassThroughStage, move |_, elapsed| {
            recorded.lock().unwrap().push(elapsed);
        }))
        .build();

    let mut drained = Vec::new();
    pipeline
        .run(vec![Item::new("foo")], |item| drained.push(item.payload))
        .await;

    assert_eq!(drained, vec!["foo"]);
    let reports = reports.lock().unwrap();
    assert_eq!(reports.len(), 1);
    assert!(reports[0] >= Duration::ZERO);
}

#[tokio::test]
async fn consumer_owns_cleanup_of_item_directories() {
    let base = tempfile::tempdir().unwrap();
    let base_str = base.path().to_str().unwrap().to_string();

    let mut items = Vec::new();
    let mut created = Vec::new();
    for i in 0..3u32 {
        let mut item = Item::new(i);
        created.push(item.create_temp_dir(&base_str, "flow").unwrap());
        items.push(item);
    }

    pass_through_pipeline(2)
        .run(items, |mut item| {
            assert_eq!(item.temp_dirs().len(), 1);
            item.release_temp_dirs();
            assert!(!item.has_temp_dirs());
        })
        .await;

    assert!(created.iter().all(|dir| !dir.exists()));
}

#[test]
fn directory_creation_error_is_returned_to_caller() {
    let base = tempfile::tempdir().unwrap();
    let missing = base.path().join("missing");

    let mut item = Item::new(());
    let result = item.create_temp_dir(missing.to_str().unwrap(), "flow");

    assert!(matches!(
        result,
        Err(PipelineError::DirectoryCreation { ref path, .. }) if path == &missing
    ));
    assert!(item.temp_dirs().is_empty());
}
