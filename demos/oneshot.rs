use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use taskkit::{CoreAffinity, Task, TaskConfig, ThreadKernel};

static FLUSHED: AtomicU32 = AtomicU32::new(0);

/// One-shot job: flush `count` buffered records, then return
fn flush_records(count: u32) {
    for _ in 0..count {
        FLUSHED.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(std::time::Duration::from_millis(10));
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("taskkit=debug,oneshot=info")
        .init();

    let kernel = Arc::new(ThreadKernel::default());
    let flusher = Task::new(kernel);

    let cfg = TaskConfig::default()
        .with_name("flusher")
        .with_priority(4)
        .with_core(CoreAffinity::Core(1));

    flusher.start(Some(flush_records as fn(u32)), 20, &cfg)?;
    println!("Flush started, running = {}", flusher.is_running());

    // A second start is refused while the first run is live.
    if let Err(e) = flusher.start(Some(flush_records as fn(u32)), 5, &cfg) {
        println!("Second start refused: {}", e);
    }

    // Invalid placement never reaches the kernel.
    let bad = cfg.clone().with_core(CoreAffinity::Core(7));
    if let Err(e) = Task::new(flusher.kernel().clone()).start(Some(flush_records as fn(u32)), 1, &bad) {
        println!("Bad config refused: {}", e);
    }

    flusher.stopped().await;
    println!("Flush finished: {} records", FLUSHED.load(Ordering::SeqCst));

    // Idle handles are reusable.
    flusher.spawn(|| println!("Second run on the same handle"), &cfg)?;
    flusher.stopped().await;

    Ok(())
}
