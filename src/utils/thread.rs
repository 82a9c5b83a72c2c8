use parking_lot::Mutex;
use std::sync::mpsc;
use std::thread;

/// Runs `f` over `items` on at most `workers` threads and returns once every
/// item is done. Each worker sends its result back over a channel; the
/// results are only handed to the caller after the scope has joined, so no
/// partial set is ever observable. Result order is unspecified.
pub fn bounded_map<T, R, F>(items: Vec<T>, workers: usize, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync,
{
    if items.is_empty() {
        return Vec::new();
    }

    let workers = workers.clamp(1, items.len());
    let queue = Mutex::new(items.into_iter());
    let (tx, rx) = mpsc::channel();

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let queue = &queue;
            let f = &f;
            scope.spawn(move || loop {
                // Hold the lock only long enough to take the next item.
                let next = queue.lock().next();
                let Some(item) = next else { break };
                if tx.send(f(item)).is_err() {
                    break;
                }
            });
        }
    });

    drop(tx);
    rx.into_iter().collect()
}
