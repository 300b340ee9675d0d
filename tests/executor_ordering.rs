// tests/executor_ordering.rs

use std::time::{Duration, Instant};

use leo::{Executor, Graph};
use leo_test_utils::recorder::Recorder;
use leo_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn std::error::Error>>;

const WORK: Duration = Duration::from_millis(50);

/// A -> B, A -> C, B -> D, C -> D
fn diamond(recorder: &Recorder) -> Result<Graph, leo::LeoError> {
    let mut graph = Graph::new();
    for name in ["A", "B", "C", "D"] {
        graph.register_task(name, recorder.task(name, WORK));
    }
    graph.precede("A", "B")?;
    graph.precede("A", "C")?;
    graph.succeed("D", "B")?;
    graph.succeed("D", "C")?;
    Ok(graph)
}

fn assert_after(recorder: &Recorder, parent: &str, child: &str) {
    let finished = recorder.finish_of(parent).expect("parent finished");
    let started = recorder.start_of(child).expect("child started");
    assert!(
        started >= finished,
        "{child} started before {parent} finished"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn diamond_respects_precedence_on_every_run() -> TestResult {
    init_tracing();

    let recorder = Recorder::new();
    let executor = Executor::new(diamond(&recorder)?);

    for _ in 0..5 {
        recorder.clear();
        with_timeout(executor.run()).await?;

        let started = recorder.started();
        assert_eq!(started.len(), 4);
        assert_eq!(started[0], "A");
        assert_eq!(started[3], "D");

        assert_after(&recorder, "A", "B");
        assert_after(&recorder, "A", "C");
        assert_after(&recorder, "B", "D");
        assert_after(&recorder, "C", "D");
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn chain_runs_in_order() -> TestResult {
    init_tracing();

    let recorder = Recorder::new();
    let mut graph = Graph::new();
    for name in ["A", "B", "C"] {
        graph.register_task(name, recorder.blocking_task(name, Duration::from_millis(10)));
    }
    graph.precede("A", "B")?;
    graph.precede("B", "C")?;

    let executor = Executor::new(graph);
    with_timeout(executor.run()).await?;

    assert_eq!(recorder.started(), vec!["A", "B", "C"]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn independent_nodes_run_concurrently() -> TestResult {
    init_tracing();

    let recorder = Recorder::new();
    let mut graph = Graph::new();
    for name in ["A", "B", "C", "D"] {
        graph.register_task(name, recorder.task(name, Duration::from_millis(200)));
    }

    let executor = Executor::new(graph);
    let started = Instant::now();
    with_timeout(executor.run()).await?;

    assert!(started.elapsed() < Duration::from_millis(600));
    assert_eq!(recorder.started().len(), 4);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blocking_siblings_do_not_serialize() -> TestResult {
    init_tracing();

    let recorder = Recorder::new();
    let mut graph = Graph::new();
    graph.register_task("root", recorder.task("root", Duration::ZERO));
    for name in ["B1", "B2", "B3", "B4"] {
        graph.register_task(name, recorder.blocking_task(name, Duration::from_millis(200)));
        graph.precede("root", name)?;
    }

    let executor = Executor::new(graph);
    let started = Instant::now();
    with_timeout(executor.run()).await?;

    assert!(started.elapsed() < Duration::from_millis(600));
    assert_eq!(recorder.started().len(), 5);
    Ok(())
}

#[tokio::test]
async fn empty_graph_runs_successfully() -> TestResult {
    let executor = Executor::new(Graph::new());
    with_timeout(executor.run()).await?;
    assert_eq!(executor.in_flight(), 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn wide_fan_out_runs_every_node_once() -> TestResult {
    init_tracing();

    let recorder = Recorder::new();
    let mut graph = Graph::new();
    graph.register_task("root", recorder.task("root", Duration::ZERO));
    graph.register_task("sink", recorder.task("sink", Duration::ZERO));

    let names: Vec<String> = (0..64).map(|i| format!("leaf{i}")).collect();
    for name in &names {
        graph.register_task(name.as_str(), recorder.task(name, Duration::from_millis(5)));
        graph.precede("root", name)?;
        graph.precede(name, "sink")?;
    }

    let executor = Executor::new(graph);
    with_timeout(executor.run()).await?;

    for name in names.iter().map(String::as_str).chain(["root", "sink"]) {
        assert_eq!(recorder.times_started(name), 1, "{name}");
    }
    for name in &names {
        assert_after(&recorder, name, "sink");
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn repeated_edge_still_runs_child_once() -> TestResult {
    let recorder = Recorder::new();
    let mut graph = Graph::new();
    graph.register_task("A", recorder.task("A", Duration::ZERO));
    graph.register_task("B", recorder.task("B", Duration::ZERO));
    graph.precede("A", "B")?;
    graph.precede("A", "B")?;
    assert_eq!(graph.edge_count(), 2);

    let executor = Executor::new(graph);
    with_timeout(executor.run()).await?;

    assert_eq!(recorder.times_started("B"), 1);
    assert_after(&recorder, "A", "B");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn one_graph_can_seed_several_executors() -> TestResult {
    init_tracing();

    let recorder = Recorder::new();
    let graph = diamond(&recorder)?;

    let first = Executor::new(graph.clone());
    let second = Executor::new(graph);

    with_timeout(first.run()).await?;
    with_timeout(second.run()).await?;

    assert_eq!(recorder.times_started("A"), 2);
    assert_eq!(recorder.times_started("D"), 2);
    assert_eq!(first.graph().edges(), second.graph().edges());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_runs_on_one_executor_are_independent() -> TestResult {
    init_tracing();

    let recorder = Recorder::new();
    let executor = Executor::new(diamond(&recorder)?);

    let (a, b) = tokio::join!(executor.run(), executor.run());
    a?;
    b?;

    for name in ["A", "B", "C", "D"] {
        assert_eq!(recorder.times_started(name), 2, "{name}");
    }
    Ok(())
}
