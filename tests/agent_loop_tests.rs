use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use thermolink::agent::sensors::TemperatureSource;
use thermolink::agent::telemetry::THERMOSTAT_1;
use thermolink::hub::{CommandRequest, HubError, LoopbackHub, Message, StatusCode};
use thermolink::TemperatureController;

const MODEL_ID: &str = "dtmi:com:example:TemperatureController;2";

fn controller(hub: &Arc<LoopbackHub>) -> TemperatureController<LoopbackHub> {
    TemperatureController::new(hub.clone())
        .with_interval(Duration::from_secs(5))
        .with_temperature_source(TemperatureSource::seeded(11))
}

fn assert_temperature(msg: &Message) {
    assert_eq!(msg.component_name.as_deref(), Some(THERMOSTAT_1));
    let body = msg.body_json().unwrap();
    let t = body["temperature"].as_f64().expect("temperature should be numeric");
    assert!((0.0..500.0).contains(&t), "temperature out of range: {}", t);
    assert_eq!(t.fract(), 0.0);
}

fn assert_memory(msg: &Message) {
    assert!(msg.component_name.is_none());
    let body = msg.body_json().unwrap();
    assert!(body["WorkingSet_DeviceMemory"].is_u64(), "body was {}", body);
}

async fn next(rx: &mut mpsc::Receiver<Message>) -> Message {
    rx.recv().await.expect("hub channel closed early")
}

#[tokio::test(start_paused = true)]
async fn test_temperature_then_memory_each_cycle() {
    let (hub, mut rx) = LoopbackHub::new("dev", MODEL_ID, 16);
    let hub = Arc::new(hub);
    let cancel = CancellationToken::new();

    let mut agent = controller(&hub);
    let token = cancel.clone();
    let task = tokio::spawn(async move {
        let result = agent.run(token).await;
        (result, agent)
    });

    for _ in 0..3 {
        assert_temperature(&next(&mut rx).await);
        assert_memory(&next(&mut rx).await);
    }

    cancel.cancel();
    let (result, agent) = task.await.unwrap();
    assert!(result.is_ok());
    assert!(rx.try_recv().is_err(), "no telemetry after cancellation");

    // Every sent temperature lands in the device context
    let readings = agent.context().readings(THERMOSTAT_1).unwrap();
    assert_eq!(readings.len(), 3);
    let max = agent.context().max_temperature(THERMOSTAT_1).unwrap();
    assert!(readings.values().all(|v| *v <= max));
}

#[tokio::test(start_paused = true)]
async fn test_cycles_are_spaced_by_interval() {
    let (hub, mut rx) = LoopbackHub::new("dev", MODEL_ID, 16);
    let hub = Arc::new(hub);
    let cancel = CancellationToken::new();

    let mut agent = controller(&hub);
    let token = cancel.clone();
    let task = tokio::spawn(async move { agent.run(token).await });

    let first = tokio::time::Instant::now();
    next(&mut rx).await;
    next(&mut rx).await;
    next(&mut rx).await;
    let elapsed = first.elapsed();
    assert!(elapsed >= Duration::from_secs(5), "second cycle came after {:?}", elapsed);

    cancel.cancel();
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_cancel_before_start_sends_nothing() {
    let (hub, mut rx) = LoopbackHub::new("dev", MODEL_ID, 16);
    let hub = Arc::new(hub);
    let cancel = CancellationToken::new();
    cancel.cancel();

    controller(&hub).run(cancel).await.unwrap();

    assert!(rx.try_recv().is_err());
    assert!(hub.has_handler("talktome"), "handler is registered before the loop");
}

#[tokio::test(start_paused = true)]
async fn test_cancel_mid_sleep_returns_within_one_interval() {
    let (hub, mut rx) = LoopbackHub::new("dev", MODEL_ID, 16);
    let hub = Arc::new(hub);
    let cancel = CancellationToken::new();

    let mut agent = controller(&hub);
    let token = cancel.clone();
    let task = tokio::spawn(async move { agent.run(token).await });

    next(&mut rx).await;
    next(&mut rx).await;

    tokio::time::sleep(Duration::from_secs(1)).await;
    let cancelled_at = tokio::time::Instant::now();
    cancel.cancel();

    let result = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("loop did not stop within one interval")
        .unwrap();
    assert!(result.is_ok());
    assert!(cancelled_at.elapsed() < Duration::from_secs(5));
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_send_failure_ends_the_loop() {
    let (hub, rx) = LoopbackHub::new("dev", MODEL_ID, 16);
    let hub = Arc::new(hub);
    drop(rx);

    let result = controller(&hub).run(CancellationToken::new()).await;
    assert!(matches!(result, Err(HubError::Closed)));
}

#[tokio::test(start_paused = true)]
async fn test_command_answered_while_loop_runs() {
    let (hub, mut rx) = LoopbackHub::new("dev", MODEL_ID, 16);
    let hub = Arc::new(hub);
    let cancel = CancellationToken::new();

    let mut agent = controller(&hub);
    let token = cancel.clone();
    let task = tokio::spawn(async move { agent.run(token).await });

    // First message means the handler is already registered
    next(&mut rx).await;

    let resp = hub.invoke(&CommandRequest::new("talktome", r#"{"name":"Dave"}"#));
    assert_eq!(resp.status, StatusCode::Completed);
    assert_eq!(resp.payload, br#"{"name":"Howdy from Pi to Dave !!!"}"#.to_vec());

    let resp = hub.invoke(&CommandRequest::new("talktome", "{not json"));
    assert_eq!(resp.status, StatusCode::BadRequest);
    assert!(resp.is_empty());

    let resp = hub.invoke(&CommandRequest::new("reboot", "{}"));
    assert_eq!(resp.status, StatusCode::NotFound);

    cancel.cancel();
    task.await.unwrap().unwrap();
}
