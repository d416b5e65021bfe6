use pretty_assertions::assert_eq;
use tokio::sync::oneshot;

use super::*;

type Reply = Result<Vec<&'static str>, String>;

/// An operation that completes when the returned sender fires.
fn pending_operation() -> (oneshot::Sender<Reply>, impl Future<Output = Reply> + Send + 'static) {
	let (tx, rx) = oneshot::channel::<Reply>();
	let op = async move { rx.await.unwrap_or_else(|_| Err("sender dropped".to_string())) };
	(tx, op)
}

#[tokio::test(flavor = "current_thread")]
async fn trigger_moves_through_loading_to_success() {
	let controller = QueryController::new();
	let mut states = controller.subscribe();
	let (tx, op) = pending_operation();

	let handle = controller.trigger(op);
	assert_eq!(controller.state(), QueryState::Loading);
	assert_eq!(controller.generation().get(), 1);

	tx.send(Ok(vec!["Inception"])).unwrap();
	let settled = handle.await.unwrap();

	assert_eq!(settled, Settlement::Applied(QueryState::Success(vec!["Inception"])));
	assert_eq!(controller.state(), QueryState::Success(vec!["Inception"]));
	states.changed().await.unwrap();
	assert_eq!(*states.borrow_and_update(), QueryState::Success(vec!["Inception"]));
}

#[tokio::test(flavor = "current_thread")]
async fn failure_becomes_error_state() {
	let controller = QueryController::<Vec<&'static str>>::new();
	let handle = controller.trigger(async { Err::<Vec<&'static str>, _>("catalog returned status 503: ") });
	handle.await.unwrap();
	assert_eq!(controller.state().error(), Some("catalog returned status 503: "));
}

#[tokio::test(flavor = "current_thread")]
async fn panic_in_operation_becomes_error_state() {
	let controller = QueryController::<Vec<&'static str>>::new();
	let handle = controller.trigger(async {
		if controller_should_panic() {
			panic!("decoder blew up");
		}
		Ok::<_, String>(Vec::new())
	});
	let settled = handle.await.unwrap();
	assert_eq!(settled.applied(), Some(&QueryState::Error("decoder blew up".to_string())));
}

fn controller_should_panic() -> bool {
	true
}

#[tokio::test(flavor = "current_thread")]
async fn late_completion_of_superseded_trigger_is_dropped() {
	let controller = QueryController::new();
	let (first_tx, first) = pending_operation();
	let (second_tx, second) = pending_operation();

	let first_handle = controller.trigger(first);
	let second_handle = controller.trigger(second);

	second_tx.send(Ok(vec!["ab"])).unwrap();
	assert!(second_handle.await.unwrap().applied().is_some());

	first_tx.send(Ok(vec!["a"])).unwrap();
	let first_settled = first_handle.await.unwrap();

	assert_eq!(
		first_settled,
		Settlement::Stale {
			launched: Generation::ZERO.next(),
			current: Generation::ZERO.next().next(),
		}
	);
	assert_eq!(controller.state(), QueryState::Success(vec!["ab"]));
}

#[tokio::test(flavor = "current_thread")]
async fn superseded_completion_leaves_newer_trigger_loading() {
	let controller = QueryController::new();
	let (first_tx, first) = pending_operation();
	let (second_tx, second) = pending_operation();

	let first_handle = controller.trigger(first);
	let second_handle = controller.trigger(second);

	first_tx.send(Ok(vec!["a"])).unwrap();
	assert!(first_handle.await.unwrap().applied().is_none());
	assert_eq!(controller.state(), QueryState::Loading);

	second_tx.send(Err("offline".to_string())).unwrap();
	second_handle.await.unwrap();
	assert_eq!(controller.state(), QueryState::Error("offline".to_string()));
}

#[tokio::test(flavor = "current_thread")]
async fn reset_discards_in_flight_completion() {
	let controller = QueryController::new();
	let (tx, op) = pending_operation();
	let handle = controller.trigger(op);

	controller.reset();
	assert!(controller.state().is_idle());

	tx.send(Ok(vec!["stale"])).unwrap();
	assert!(handle.await.unwrap().applied().is_none());
	assert!(controller.state().is_idle());
	assert_eq!(controller.state().data(), None);
}

#[tokio::test(flavor = "current_thread")]
async fn reset_yields_idle_from_every_state() {
	let controller = QueryController::<Vec<&'static str>>::new();

	controller.reset();
	assert_eq!(controller.state(), QueryState::Idle);

	controller.trigger(async { Ok::<_, String>(vec!["x"]) }).await.unwrap();
	controller.reset();
	assert_eq!(controller.state(), QueryState::Idle);

	controller.trigger(async { Err::<Vec<&'static str>, _>("boom") }).await.unwrap();
	controller.reset();
	assert_eq!(controller.state(), QueryState::Idle);

	let (_tx, op) = pending_operation();
	let _pending = controller.trigger(op);
	controller.reset();
	assert_eq!(controller.state(), QueryState::Idle);
}

#[tokio::test(flavor = "current_thread")]
async fn invalidate_keeps_state_but_drops_completion() {
	let controller = QueryController::new();
	controller.trigger(async { Ok::<_, String>(vec!["kept"]) }).await.unwrap();

	let (tx, op) = pending_operation();
	let handle = controller.trigger(op);
	controller.invalidate();
	assert_eq!(controller.state(), QueryState::Loading);

	tx.send(Ok(vec!["dropped"])).unwrap();
	assert!(handle.await.unwrap().applied().is_none());
	assert_eq!(controller.state(), QueryState::Loading);
}

#[tokio::test(flavor = "current_thread")]
async fn every_trigger_and_reset_advances_generation() {
	let controller = QueryController::<Vec<&'static str>>::new();
	let start = controller.generation();
	let _a = controller.trigger(async { Ok::<_, String>(vec![]) });
	controller.reset();
	let _b = controller.trigger(async { Ok::<_, String>(vec![]) });
	assert_eq!(controller.generation().get(), start.get() + 3);
}
