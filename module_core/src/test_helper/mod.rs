use crate::{Event, EventBus, EventKind, EventKindType};
use tokio::time::timeout;

/// Sends a quit signal to a running module and waits for it to stop gracefully.
///
/// This function publishes a [`QuitEvent`](EventKind::QuitEvent) through the given [`EventBus`],
/// signaling the target module to terminate. It then waits asynchronously for the module's task
/// (represented by the provided [`tokio::task::JoinHandle`]) to complete within a fixed timeout.
///
/// # Panics
/// This function panics if:
/// - The module does not stop within the specified timeout duration.
/// - The task returns an error (`Err(())`).
pub async fn stop_module(
    event_bus: &EventBus,
    handle: &mut tokio::task::JoinHandle<Result<(), ()>>,
) {
    event_bus.publish(&Event {
        kind: EventKind::QuitEvent,
    });
    let _ = timeout(std::time::Duration::from_millis(100), handle)
        .await
        .expect("Module doesn't handle quit event in timeout")
        .unwrap();
}

/// Waits asynchronously for a specific type of [`Event`] to be received on a
/// [`tokio::sync::broadcast::Receiver`] within a given duration.
///
/// The total waiting time is divided into small polling steps (each
/// one-tenth of the total duration), allowing intermediate timeouts so the
/// function remains responsive. Events of other types received in the
/// meantime are skipped.
///
/// # Panics
///
/// This function panics if no matching event is received within the specified
/// `duration`.
///
/// # Returns
///
/// Returns the first [`Event`] whose [`EventKind`] discriminant matches
/// `exp_event`.
pub async fn wait_for_event(
    rx: &mut tokio::sync::broadcast::Receiver<Event>,
    duration: std::time::Duration,
    exp_event: EventKindType,
) -> Event {
    let steps = duration.as_millis() / 10;
    let step_duration = duration / 10;
    for _ in 0..steps {
        if let Ok(Ok(event)) = timeout(step_duration, rx.recv()).await
            && EventKindType::from(&event.kind) == exp_event
        {
            return event;
        }
    }
    panic!("Failed to receive event of type {:?}", exp_event);
}
