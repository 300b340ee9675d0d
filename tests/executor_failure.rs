// tests/executor_failure.rs

use std::error::Error as _;
use std::time::{Duration, Instant};

use leo::{Executor, Graph, LeoError, Task};
use leo_test_utils::recorder::Recorder;
use leo_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn failure_is_named_and_blocks_descendants_but_not_siblings() -> TestResult {
    init_tracing();

    let recorder = Recorder::new();
    let mut graph = Graph::new();
    graph.register_task("A", recorder.task("A", Duration::ZERO));
    graph.register_task("B", recorder.failing_task("B", Duration::from_millis(10), "boom"));
    graph.register_task("C", recorder.task("C", Duration::from_millis(200)));
    graph.register_task("D", recorder.task("D", Duration::ZERO));
    graph.precede("A", "B")?;
    graph.precede("A", "C")?;
    graph.precede("B", "D")?;
    graph.precede("C", "D")?;

    let executor = Executor::new(graph);
    let err = with_timeout(executor.run()).await.unwrap_err();

    match &err {
        LeoError::TaskFailure { node, source } => {
            assert_eq!(node, "B");
            assert_eq!(source.to_string(), "boom");
        }
        other => panic!("expected TaskFailure, got {other:?}"),
    }
    assert_eq!(err.failed_node(), Some("B"));
    assert_eq!(err.to_string(), "error executing node B: boom");
    assert!(err.source().is_some());

    // C was already running when B failed; it still completes.
    with_timeout(executor.wait_idle()).await;
    assert!(recorder.finish_of("C").is_some());
    assert_eq!(recorder.times_started("D"), 0);
    assert_eq!(executor.in_flight(), 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn run_returns_before_stragglers_finish() -> TestResult {
    init_tracing();

    let recorder = Recorder::new();
    let mut graph = Graph::new();
    graph.register_task("slow", recorder.task("slow", Duration::from_millis(500)));
    graph.register_task("fail", recorder.failing_task("fail", Duration::ZERO, "nope"));

    let executor = Executor::new(graph);
    let started = Instant::now();
    let err = with_timeout(executor.run()).await.unwrap_err();

    assert!(started.elapsed() < Duration::from_millis(400));
    assert_eq!(err.failed_node(), Some("fail"));
    assert!(recorder.finish_of("slow").is_none());
    assert!(executor.in_flight() >= 1);

    with_timeout(executor.wait_idle()).await;
    assert!(recorder.finish_of("slow").is_some());
    assert_eq!(executor.in_flight(), 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn only_the_first_failure_is_reported() -> TestResult {
    init_tracing();

    let recorder = Recorder::new();
    let mut graph = Graph::new();
    graph.register_task("early", recorder.failing_task("early", Duration::from_millis(10), "first"));
    graph.register_task("late", recorder.failing_task("late", Duration::from_millis(300), "second"));

    let executor = Executor::new(graph);
    let err = with_timeout(executor.run()).await.unwrap_err();
    assert_eq!(err.failed_node(), Some("early"));

    with_timeout(executor.wait_idle()).await;
    assert!(recorder.finish_of("late").is_some());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn panicking_task_is_reported_as_failure() -> TestResult {
    init_tracing();

    let mut graph = Graph::new();
    graph.register_task(
        "explodes",
        Task::from_async(|| async {
            if true {
                panic!("kaboom");
            }
            Ok(())
        }),
    );
    graph.register("after", || async { Ok(()) });
    graph.precede("explodes", "after")?;

    let executor = Executor::new(graph);
    let err = with_timeout(executor.run()).await.unwrap_err();

    assert_eq!(err.failed_node(), Some("explodes"));
    assert!(err.to_string().contains("panicked"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blocking_task_error_carries_its_cause() -> TestResult {
    let mut graph = Graph::new();
    graph.register_blocking("io", || Err(anyhow::anyhow!("disk on fire")));

    let executor = Executor::new(graph);
    let err = with_timeout(executor.run()).await.unwrap_err();

    assert_eq!(err.to_string(), "error executing node io: disk on fire");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn a_failed_run_does_not_affect_the_next_one() -> TestResult {
    init_tracing();

    let recorder = Recorder::new();
    let mut graph = Graph::new();
    graph.register_task("A", recorder.task("A", Duration::ZERO));
    graph.register_task("B", recorder.failing_task("B", Duration::ZERO, "boom"));
    graph.register_task("C", recorder.task("C", Duration::ZERO));
    graph.precede("A", "B")?;
    graph.precede("B", "C")?;

    let executor = Executor::new(graph);
    for _ in 0..3 {
        let err = with_timeout(executor.run()).await.unwrap_err();
        assert_eq!(err.failed_node(), Some("B"));
    }
    with_timeout(executor.wait_idle()).await;

    assert_eq!(recorder.times_started("A"), 3);
    assert_eq!(recorder.times_started("B"), 3);
    assert_eq!(recorder.times_started("C"), 0);
    Ok(())
}
