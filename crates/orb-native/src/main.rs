use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use instant::Instant;
use orb_core::{
    execute, submit_message, Announcement, Announcer, MemoryStorage, NoMemoryProbe, OperationError,
    OperationOptions, OrbAnimationState, OrbFrame, OrbRuntime, Politeness, RetryAction,
    RuntimeConfig,
};

const FRAME_MS: f64 = 1000.0 / 60.0;

/// Prints announcements the way a screen reader would receive them.
struct LogAnnouncer;

impl Announcer for LogAnnouncer {
    fn announce(&mut self, announcement: &Announcement) {
        match announcement.politeness {
            Politeness::Assertive => log::warn!("[a11y] {}", announcement.message),
            Politeness::Polite => log::info!("[a11y] {}", announcement.message),
        }
    }

    fn clear(&mut self) {
        log::debug!("[a11y] cleared");
    }
}

/// One scripted phase: how long it lasts and the simulated frame time.
struct Phase {
    name: &'static str,
    frames: u32,
    frame_ms: f64,
}

const PHASES: [Phase; 4] = [
    Phase {
        name: "warm-up",
        frames: 120,
        frame_ms: FRAME_MS,
    },
    Phase {
        name: "slow device",
        frames: 90,
        frame_ms: 50.0,
    },
    Phase {
        name: "recovery",
        frames: 120,
        frame_ms: FRAME_MS,
    },
    Phase {
        name: "settle",
        frames: 180,
        frame_ms: FRAME_MS,
    },
];

fn load_config() -> anyhow::Result<RuntimeConfig> {
    match std::env::var("ORB_CONFIG") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading ORB_CONFIG at {path}"))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing {path}"))
        }
        Err(_) => Ok(RuntimeConfig::default()),
    }
}

fn log_frame(phase: &str, frame: &OrbFrame) {
    log::info!(
        "[{phase}] {} {:.2} quality={:?} particles={} radius={:.3}",
        frame.state,
        frame.progress,
        frame.quality,
        frame.particle_count,
        frame.uniforms.radius
    );
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let realtime = !std::env::args().any(|a| a == "--fast");
    let config = load_config()?;
    let store = config
        .store_builder()
        .local_storage(MemoryStorage::new())
        .session_storage(MemoryStorage::new())
        .build();
    let runtime = Rc::new(RefCell::new(OrbRuntime::new(
        config,
        store,
        Box::new(NoMemoryProbe),
        Box::new(LogAnnouncer),
    )));

    runtime.borrow_mut().on_user_activity();

    // an empty submission fails validation and leaves a retry behind
    let retried = Rc::new(RefCell::new(false));
    let flag = retried.clone();
    let options = OperationOptions::default()
        .with_retry(RetryAction::new(move || *flag.borrow_mut() = true));
    let outcome = pollster::block_on(execute(&runtime, options, submit_message(String::new())));
    if let Some(Err(err)) = &outcome {
        log::info!("submission rejected: {err}");
    }

    let started = Instant::now();
    for (index, phase) in PHASES.iter().enumerate() {
        if index == 2 {
            if let Some(retry) = runtime.borrow_mut().take_retry_action() {
                retry.invoke();
            }
            let work = async { Ok::<_, OperationError>(()) };
            let options = OperationOptions::default().with_success_message("Reconnected");
            pollster::block_on(execute(&runtime, options, work));
        }
        let mut last = None;
        for _ in 0..phase.frames {
            last = Some(runtime.borrow_mut().tick(phase.frame_ms));
            if realtime {
                thread::sleep(Duration::from_secs_f64(phase.frame_ms / 1000.0));
            }
        }
        if let Some(frame) = &last {
            log_frame(phase.name, frame);
        }
    }

    let rt = runtime.borrow();
    let store = rt.store();
    log::info!(
        "done in {:.1}s: state={} quality={:?} fps={:.1} retry_invoked={}",
        started.elapsed().as_secs_f64(),
        store.orb().animation_state,
        store.orb().quality_level,
        store.orb().performance_metrics.fps,
        retried.borrow()
    );
    if store.orb().animation_state != OrbAnimationState::Idle {
        log::warn!("orb did not settle back to idle");
    }
    Ok(())
}
