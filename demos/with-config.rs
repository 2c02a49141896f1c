use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use taskkit::{load_toml_config, LoopSettings, Task, TaskConfig, ThreadKernel};

static HEARTBEATS: AtomicU32 = AtomicU32::new(0);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("taskkit=info")
        .init();

    let config = load_toml_config(concat!(env!("CARGO_MANIFEST_DIR"), "/../demos/config/tasks.toml"))?;
    let heartbeat = LoopSettings::from_config(&config, "tasks.heartbeat")?;
    let report = TaskConfig::from_config(&config, "tasks.report")?;

    println!(
        "heartbeat: priority {}, core {}, every {}ms",
        heartbeat.task.priority, heartbeat.task.core, heartbeat.period_ms
    );

    let kernel = Arc::new(
        ThreadKernel::builder()
            .max_priorities(config.get_int("kernel.max_priorities").unwrap_or(25) as u32)
            .build(),
    );

    let heartbeat_task = Task::new(kernel.clone());
    heartbeat_task.run_every(
        || HEARTBEATS.fetch_add(1, Ordering::SeqCst) < 9,
        &heartbeat.task,
        heartbeat.period_ms,
    )?;

    let report_task = Task::new(kernel);
    report_task.spawn(
        || {
            std::thread::sleep(Duration::from_millis(300));
            println!("report: {} heartbeats so far", HEARTBEATS.load(Ordering::SeqCst));
        },
        &report,
    )?;

    heartbeat_task.stopped().await;
    report_task.stopped().await;
    println!("done: {} heartbeats", HEARTBEATS.load(Ordering::SeqCst));

    Ok(())
}
