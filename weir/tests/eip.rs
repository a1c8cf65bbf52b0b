mod common;

use common::{append, body};
use std::sync::Arc;
use weir::{
    BoxError, Concurrent, Message, POSITION, Processor, Route, Sequential, aggregate, filter,
    multicast, split, testing::{RecordingSink, collect},
};

fn words(m: &Message) -> Result<Vec<Message>, BoxError> {
    let text = m.body_str().ok_or("body is not text")?;
    Ok(text
        .split_whitespace()
        .map(|w| m.set_body(w.to_owned()))
        .collect())
}

#[test]
fn test_split_then_transform() {
    let route = Route::new(split(words)) >> append("!");
    let sink = RecordingSink::new();
    route.process(Message::new("a b c".to_string()), sink.continuation());

    assert_eq!(sink.bodies(), vec!["a!", "b!", "c!"]);
}

#[test]
fn test_split_error_fails_once() {
    let route = Route::new(split(words));
    let out = collect(&route, Message::new(42u32));

    assert_eq!(out.len(), 1);
    assert!(out[0].is_failure());
    assert_eq!(out[0].message().body_as::<u32>(), Some(&42));
}

#[test]
fn test_filter_after_split() {
    let route = Route::new(split(words)) >> filter(|m: &Message| m.body_str() != Some("skip"));
    let sink = RecordingSink::new();
    route.process(Message::new("keep skip also".to_string()), sink.continuation());

    assert_eq!(sink.bodies(), vec!["keep", "also"]);
}

#[test]
fn test_filter_passes_message_unchanged() {
    let route = Route::new(filter(|_: &Message| true));
    let input = Message::new("x").add_header("h", 7u8);
    let out = collect(&route, input);

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].message().header_as::<u8>("h"), Some(&7));
    assert_eq!(body(out[0].message()), "x");
}

#[test]
fn test_aggregate_absorbs_or_emits() {
    let route = Route::new(aggregate(|m: &Message| {
        Ok::<_, BoxError>(match m.body_as::<u32>() {
            Some(n) if n % 2 == 0 => Some(m.set_body(n / 2)),
            _ => None,
        })
    }));

    assert!(collect(&route, Message::new(3u32)).is_empty());
    let out = collect(&route, Message::new(8u32));
    assert_eq!(out[0].message().body_as::<u32>(), Some(&4));
}

#[test]
fn test_multicast_tags_each_reply() {
    let route = Route::new(multicast(
        Sequential::shared(),
        vec![append("-a"), append("-b")],
    ));
    let out = collect(&route, Message::new("m".to_string()));

    assert_eq!(out.len(), 2);
    let mut tagged: Vec<(usize, String)> = out
        .iter()
        .map(|v| {
            (
                *v.message().header_as::<usize>(POSITION).unwrap(),
                body(v.message()).to_owned(),
            )
        })
        .collect();
    tagged.sort();
    assert_eq!(tagged, vec![(0, "m-a".to_owned()), (1, "m-b".to_owned())]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_multicast_delivers_all() {
    let strategy = Concurrent::current().unwrap().shared();
    let route = Route::new(multicast(
        Arc::clone(&strategy),
        (0..8).map(|_| append("+")),
    ));
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    route.run(Message::new("m".to_string()), move |v| {
        let _ = tx.send(v);
    });

    let mut received = 0;
    while let Some(outcome) = rx.recv().await {
        assert_eq!(body(outcome.message()), "m+");
        received += 1;
        if received == 8 {
            break;
        }
    }
    assert_eq!(received, 8);
}
