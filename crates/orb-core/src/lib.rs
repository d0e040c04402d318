pub mod announce;
pub mod clock;
pub mod color;
pub mod constants;
pub mod easing;
pub mod engine;
pub mod error;
pub mod manager;
pub mod operation;
pub mod particles;
pub mod performance;
pub mod persist;
pub mod runtime;
pub mod store;
pub mod timer;
pub mod transition;
pub mod visual;

pub use announce::{announcements_for, Announcement, Announcer, Politeness, RecordingAnnouncer, SilentAnnouncer};
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{OrbAnimationEngine, OrbUniforms};
pub use error::{ContextMap, ErrorKind, ErrorState, OperationError, RetryAction, StorageError, StoreError};
pub use manager::{OrbFrame, OrbStateManager};
pub use operation::{execute, start_voice_input, submit_message, OperationOptions};
pub use particles::{ParticleField, ParticleFieldCache, ParticleSystemConfig, ParticleVertex};
pub use performance::{FrameRateMonitor, MemoryProbe, NoMemoryProbe, PerformanceMetrics, QualityLevel};
pub use persist::{MemoryStorage, Persistence, StorageBackend};
pub use runtime::{OperationTicket, OrbRuntime, RuntimeConfig};
pub use store::*;
pub use transition::{TransitionController, TransitionState, TransitionStep};
pub use visual::{config_for, OrbAnimationState, OrbVisualConfig};
