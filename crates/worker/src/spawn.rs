use std::future::Future;
use std::sync::OnceLock;

use tokio::task::JoinHandle;

use crate::TaskClass;

fn runtime_handle() -> tokio::runtime::Handle {
	if let Ok(handle) = tokio::runtime::Handle::try_current() {
		return handle;
	}

	static GLOBAL_RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
	let runtime = GLOBAL_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.worker_threads(1)
			.thread_name("marquee-worker-global")
			.build()
			.expect("failed to build marquee-worker global tokio runtime")
	});
	runtime.handle().clone()
}

/// Spawns an async task, tagging the spawn with its class.
///
/// Uses the ambient tokio runtime when there is one, so tests running on a
/// paused current-thread runtime keep control of every timer.
pub fn spawn<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn");
	runtime_handle().spawn(fut)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test(flavor = "current_thread")]
	async fn spawn_runs_on_ambient_runtime() {
		let handle = spawn(TaskClass::Interactive, async { 7 });
		assert_eq!(handle.await.unwrap(), 7);
	}

	#[test]
	fn spawn_outside_runtime_uses_global_fallback() {
		let (tx, rx) = std::sync::mpsc::channel();
		spawn(TaskClass::Background, async move {
			let _ = tx.send("done");
		});
		assert_eq!(rx.recv().unwrap(), "done");
	}
}
