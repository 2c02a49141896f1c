#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use taskkit_runtime::{
    should_delay, CoreAffinity, Kernel, KernelError, SpawnParams, Task, TaskEntry, Tick,
};

/// What a create call was asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub name: String,
    pub stack_words: u32,
    pub priority: u32,
    pub core: CoreAffinity,
}

/// Kernel double with a virtual tick counter.
///
/// Tasks still run on real threads, but `delay_until` never sleeps: it moves
/// the virtual clock forward to the wake tick and records the new anchor.
pub struct MockKernel {
    max_priorities: u32,
    cores: u8,
    tick_rate_hz: u32,
    ticks: AtomicU32,
    creates: AtomicUsize,
    deletes: AtomicUsize,
    reject_with: Mutex<Option<i32>>,
    created: Mutex<Vec<Created>>,
    wakes: Mutex<Vec<Tick>>,
}

impl MockKernel {
    pub fn dual_core() -> Arc<Self> {
        Arc::new(Self::with(25, 2, 1000))
    }

    pub fn single_core() -> Arc<Self> {
        Arc::new(Self::with(25, 1, 1000))
    }

    pub fn with(max_priorities: u32, cores: u8, tick_rate_hz: u32) -> Self {
        Self {
            max_priorities,
            cores,
            tick_rate_hz,
            ticks: AtomicU32::new(0),
            creates: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            reject_with: Mutex::new(None),
            created: Mutex::new(Vec::new()),
            wakes: Mutex::new(Vec::new()),
        }
    }

    /// Make the next create call fail with `code`.
    pub fn reject_next(&self, code: i32) {
        *self.reject_with.lock().unwrap() = Some(code);
    }

    pub fn set_ticks(&self, tick: Tick) {
        self.ticks.store(tick, Ordering::SeqCst);
    }

    /// Pretend the calling task spent `ticks` ticks working.
    pub fn advance(&self, ticks: Tick) {
        self.ticks.fetch_add(ticks, Ordering::SeqCst);
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<Created> {
        self.created.lock().unwrap().clone()
    }

    pub fn wakes(&self) -> Vec<Tick> {
        self.wakes.lock().unwrap().clone()
    }
}

impl Kernel for MockKernel {
    type Handle = u32;

    fn create_pinned(&self, entry: TaskEntry, params: &SpawnParams<'_>) -> Result<u32, KernelError> {
        let id = self.creates.fetch_add(1, Ordering::SeqCst) as u32 + 1;
        if let Some(code) = self.reject_with.lock().unwrap().take() {
            return Err(KernelError::Rejected(code));
        }
        self.created.lock().unwrap().push(Created {
            name: params.name.to_string(),
            stack_words: params.stack_words,
            priority: params.priority,
            core: params.core,
        });
        thread::Builder::new()
            .name(params.name.to_string())
            .spawn(entry)?;
        Ok(id)
    }

    fn delete_self(&self) {
        self.deletes.fetch_add(1, Ordering::SeqCst);
    }

    fn tick_count(&self) -> Tick {
        self.ticks.load(Ordering::SeqCst)
    }

    fn delay_until(&self, previous_wake: &mut Tick, increment: Tick) {
        let now = self.tick_count();
        let wake = previous_wake.wrapping_add(increment);
        if should_delay(*previous_wake, wake, now) {
            self.ticks.store(wake, Ordering::SeqCst);
        }
        *previous_wake = wake;
        self.wakes.lock().unwrap().push(wake);
    }

    fn tick_rate_hz(&self) -> u32 {
        self.tick_rate_hz
    }

    fn max_priorities(&self) -> u32 {
        self.max_priorities
    }

    fn core_count(&self) -> u8 {
        self.cores
    }
}

pub const WAIT: Duration = Duration::from_secs(5);

/// Wait for a task to go idle, failing the test after [`WAIT`].
pub async fn wait_stopped<K: Kernel>(task: &Task<K>) {
    tokio::time::timeout(WAIT, task.stopped())
        .await
        .expect("task did not stop in time");
}

/// Poll `cond` until it holds or [`WAIT`] elapses.
pub fn eventually(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    cond()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("taskkit=debug")
        .with_test_writer()
        .try_init();
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber local to this thread and return what it logged.
pub fn capture_logs(f: impl FnOnce()) -> String {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}
