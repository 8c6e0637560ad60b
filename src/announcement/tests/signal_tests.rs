//! Signal channel tests using mocked handlers.

use crate::announcement::{
    domain::{SignalResponse, SignalType},
    ports::{MockSignalHandler, SignalHandlerError},
    services::AnnouncementBus,
};
use crate::config::DiscoveryConfig;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::sync::Arc;

#[fixture]
fn bus() -> AnnouncementBus {
    AnnouncementBus::from_config(&DiscoveryConfig::for_tests())
}

fn replying_handler(reply: Value) -> MockSignalHandler {
    let mut handler = MockSignalHandler::new();
    handler
        .expect_handle_signal()
        .returning(move |_, _| Ok(reply.clone()));
    handler
}

#[rstest]
fn directed_signal_reaches_only_its_target(bus: AnnouncementBus) {
    let mut target = MockSignalHandler::new();
    target
        .expect_handle_signal()
        .withf(|signal, data| signal.as_str() == "reload" && data == &json!({ "force": true }))
        .times(1)
        .returning(|_, _| Ok(json!("reloaded")));
    let mut bystander = MockSignalHandler::new();
    bystander.expect_handle_signal().never();

    bus.register_service("Discord Bot", Arc::new(target))
        .expect("registered");
    bus.register_service("Web Editor", Arc::new(bystander))
        .expect("registered");

    let responses = bus
        .send_signal("reload", Some("Discord Bot"), Some(json!({ "force": true })))
        .expect("signal sent");

    assert_eq!(responses.len(), 1);
    assert_eq!(
        responses.get("Discord Bot"),
        Some(&SignalResponse::Reply(json!("reloaded")))
    );
}

#[rstest]
fn broadcast_reaches_every_handler_with_null_data(bus: AnnouncementBus) {
    let mut first = MockSignalHandler::new();
    first
        .expect_handle_signal()
        .withf(|_, data| data.is_null())
        .times(1)
        .returning(|_, _| Ok(json!(1)));
    bus.register_service("Alpha", Arc::new(first))
        .expect("registered");
    bus.register_service("Beta", Arc::new(replying_handler(json!(2))))
        .expect("registered");

    let responses = bus
        .send_signal(SignalType::new("ping"), None, None)
        .expect("signal sent");

    let names: Vec<&str> = responses.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);
}

#[rstest]
fn handler_errors_are_captured_per_handler(bus: AnnouncementBus) {
    let mut failing = MockSignalHandler::new();
    failing
        .expect_handle_signal()
        .returning(|_, _| Err(SignalHandlerError::message("database offline")));
    bus.register_service("Database", Arc::new(failing))
        .expect("registered");
    bus.register_service("Web Editor", Arc::new(replying_handler(json!("ok"))))
        .expect("registered");

    let responses = bus.send_signal("sync", None, None).expect("signal sent");

    assert_eq!(
        responses.get("Database"),
        Some(&SignalResponse::failed("database offline"))
    );
    assert_eq!(
        responses.get("Web Editor"),
        Some(&SignalResponse::Reply(json!("ok")))
    );
}

#[rstest]
fn panicking_closure_handler_is_captured(bus: AnnouncementBus) {
    bus.register_signal_fn("Fragile", |_, _| panic!("handler exploded"))
        .expect("registered");

    let responses = bus.send_signal("poke", None, None).expect("signal sent");

    assert_eq!(
        responses.get("Fragile"),
        Some(&SignalResponse::failed("handler exploded"))
    );
}

#[rstest]
fn closure_handler_sees_signal_and_payload(bus: AnnouncementBus) {
    bus.register_signal_fn("Echo", |signal, data| {
        Ok(json!({ "signal": signal.as_str(), "data": data }))
    })
    .expect("registered");

    let responses = bus
        .send_signal("echo", Some("Echo"), Some(json!([1, 2])))
        .expect("signal sent");

    assert_eq!(
        responses.get("Echo").and_then(SignalResponse::reply),
        Some(&json!({ "signal": "echo", "data": [1, 2] }))
    );
}

#[rstest]
fn unknown_target_yields_empty_map(bus: AnnouncementBus) {
    bus.register_service("Alpha", Arc::new(replying_handler(json!(null))))
        .expect("registered");
    let responses = bus
        .send_signal("ping", Some("Missing"), None)
        .expect("signal sent");
    assert!(responses.is_empty());
}

#[rstest]
fn later_registration_replaces_handler(bus: AnnouncementBus) {
    bus.register_service("Alpha", Arc::new(replying_handler(json!("old"))))
        .expect("registered");
    bus.register_service("Alpha", Arc::new(replying_handler(json!("new"))))
        .expect("registered");

    let responses = bus.send_signal("ping", None, None).expect("signal sent");
    assert_eq!(
        responses.get("Alpha"),
        Some(&SignalResponse::Reply(json!("new")))
    );
}
