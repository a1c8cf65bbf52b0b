mod common;

use common::{body, delayed};
use std::time::Duration;
use weir::{
    Concurrent, Message, POSITION, Processor, Route, RoutingConfig, scatter,
    testing::{ManualStrategy, RecordingSink},
};

fn concat(a: Message, b: Message) -> Message {
    let joined = format!("{}{}", body(&a), body(&b));
    a.set_body(joined)
}

fn tagged(index: usize) -> Route {
    Route::new(move |m: Message, k: weir::Continuation| {
        k(weir::Validation::Success(m.set_body(format!("b{index}"))))
    })
}

#[test]
fn test_reordered_completions_fold_in_destination_order() {
    let strategy = ManualStrategy::new();
    let route = Route::new(
        scatter(strategy.shared(), vec![tagged(0), tagged(1), tagged(2)]).gather(|a, b| {
            let joined = format!("combine({}, {})", body(&a), body(&b));
            a.set_body(joined)
        }),
    );
    let sink = RecordingSink::new();
    route.process(Message::new("in"), sink.continuation());

    // D2, then D0, then D1.
    strategy.run(2);
    strategy.run(0);
    assert_eq!(sink.count(), 0);
    strategy.run(1);

    assert_eq!(sink.bodies(), vec!["combine(combine(b0, b1), b2)"]);
    assert!(!sink.outcomes()[0].message().has_header(POSITION));
}

#[test]
fn test_scatter_from_config() {
    let config = RoutingConfig::new();
    let route = Route::new(config.scatter(vec![tagged(0), tagged(1)]).gather(concat));
    let sink = RecordingSink::new();
    route.process(Message::new("in"), sink.continuation());

    assert_eq!(sink.bodies(), vec!["b0b1"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_replies_gather_once() {
    let strategy = Concurrent::current().unwrap().shared();
    let route = Route::new(
        scatter(
            strategy,
            vec![
                delayed("slow", Duration::from_millis(60)),
                delayed("mid", Duration::from_millis(30)),
                delayed("fast", Duration::from_millis(1)),
            ],
        )
        .gather(|a, b| {
            let joined = format!("{}|{}", body(&a), body(&b));
            a.set_body(joined)
        }),
    );

    let outcome = route
        .apply(Message::new("in"))
        .first()
        .await
        .expect("gather delivers");
    assert!(outcome.is_success());
    assert_eq!(body(outcome.message()), "slow|mid|fast");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inputs_do_not_share_barriers() {
    let strategy = Concurrent::current().unwrap().shared();
    let route = Route::new(scatter(strategy, vec![tagged(0), tagged(1)]).gather(concat));

    let outcomes = futures::future::join_all(
        (0..16).map(|_| route.apply(Message::new("in")).first()),
    )
    .await;

    for outcome in outcomes {
        let outcome = outcome.expect("gather delivers");
        assert_eq!(body(outcome.message()), "b0b1");
    }
}
