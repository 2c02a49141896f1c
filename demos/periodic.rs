use chrono::Local;
use std::sync::Arc;
use std::time::Duration;
use taskkit::{Task, TaskConfig, ThreadKernel};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("taskkit=info")
        .init();

    let kernel = Arc::new(ThreadKernel::default());
    let sampler = Task::new(kernel);

    let mut iteration = 0u32;
    sampler.run_every(
        move || {
            iteration += 1;
            let now = Local::now().format("%H:%M:%S%.3f");
            println!("[{}] sample #{}", now, iteration);

            // Uneven work per iteration; wake times stay 100ms apart anyway.
            std::thread::sleep(Duration::from_millis(u64::from(iteration % 4) * 15));
            true
        },
        &TaskConfig::default().with_name("sampler").with_priority(5),
        100,
    )?;

    tokio::time::sleep(Duration::from_secs(1)).await;

    println!("Requesting stop...");
    sampler.request_stop();
    sampler.stopped().await;
    println!("Sampler stopped, running = {}", sampler.is_running());

    Ok(())
}
