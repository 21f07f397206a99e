//! Echo Runner entry point
//!
//! Headless native demo that drives the library end to end: a synthetic
//! microphone thread feeds capture blocks, the runner chops wall-clock
//! time into fixed ticks, and the end-of-run summary lands in the
//! in-memory stores.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::thread;
    use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

    use echo_runner::audio::{capture_channel, CaptureHandle};
    use echo_runner::runner::{Controls, GameRunner};
    use echo_runner::session::{MemoryBestScore, MemoryScoreSink};
    use echo_runner::tuning::Tuning;

    /// Samples per capture block, roughly 5 ms at 48 kHz
    const BLOCK: usize = 256;

    pub fn run() {
        env_logger::init();

        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let tuning = load_tuning();

        let (handle, capture) = capture_channel(8);
        let mic = thread::spawn(move || synth_mic(handle));

        let mut runner = GameRunner::new(
            seed,
            tuning,
            Box::new(MemoryScoreSink::default()),
            Box::new(MemoryBestScore::default()),
        );
        runner.attach_voice(capture);

        log::info!("Echo Runner (headless) starting with seed {}", seed);

        let mut controls = Controls {
            start: true,
            ..Default::default()
        };
        let started = Instant::now();
        let mut last = started;
        let mut next_report = Duration::from_secs(1);

        loop {
            thread::sleep(Duration::from_millis(16));
            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f32();
            last = now;

            let events = runner.advance(dt, controls);
            controls = Controls::default();

            if started.elapsed() >= next_report {
                next_report += Duration::from_secs(1);
                let snap = runner.snapshot();
                log::info!(
                    "t={:>5.1}s score {:>6} pos ({:>7.1}, {:>5.1}) platforms {}",
                    snap.stats.elapsed_seconds,
                    snap.stats.score,
                    snap.actor.pos.x,
                    snap.actor.pos.y,
                    snap.platforms.len()
                );
            }

            if events.game_over || started.elapsed() > Duration::from_secs(45) {
                break;
            }
        }

        runner.stop();
        if let Ok(json) = serde_json::to_string_pretty(&runner.state().stats) {
            println!("{}", json);
        }
        if let Some(best) = runner.best_score() {
            log::info!("Best score this run: {}", best);
        }
        let _ = mic.join();
    }

    /// Optional tuning override from a JSON file given as the first argument
    fn load_tuning() -> Tuning {
        match std::env::args().nth(1) {
            Some(path) => match std::fs::read_to_string(&path) {
                Ok(json) => Tuning::from_json(&json),
                Err(e) => {
                    log::warn!("Tuning file {} unreadable ({}), using defaults", path, e);
                    Tuning::default()
                }
            },
            None => Tuning::default(),
        }
    }

    /// Synthetic microphone: near silence with a loud burst every ~1.2 s
    ///
    /// The burst is an in-band tone, so the analyzer reads it as a shout
    /// and the actor jumps. The thread exits once the game side drops the
    /// capture.
    fn synth_mic(handle: CaptureHandle) {
        let started = Instant::now();
        loop {
            let t = started.elapsed().as_secs_f32();
            let amp = if t.rem_euclid(1.2) < 0.15 { 0.8 } else { 0.02 };
            let block: Vec<f32> = (0..BLOCK)
                .map(|i| {
                    amp * (std::f32::consts::TAU * 50.0 * i as f32 / BLOCK as f32).sin()
                })
                .collect();
            if handle.push(block).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM hosts drive the library directly
}
