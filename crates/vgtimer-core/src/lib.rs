//! # vgtimer Core Library
//!
//! Timing model for the recurring mechanics of the Vale Guardian encounter.
//! The terminal driver in `vgtimer-cli` is a thin loop over this crate.
//!
//! ## Architecture
//!
//! - **Timer model**: each [`Timer`] keeps one timestamp (the start of its
//!   current cycle) and derives every remaining time from it, so polling
//!   never accumulates drift
//! - **Group**: [`TimerGroup`] is a two-state run machine; the caller invokes
//!   `update()` periodically and applies [`Trigger`]s as they arrive
//! - **Triggers**: [`Bindings`] map textual identifiers such as `control F9`
//!   to control actions
//! - **Storage**: TOML configuration for bindings and display cadence
//!
//! ## Key Components
//!
//! - [`TimerGroup`]: Run/stop state machine over the four timers
//! - [`Clock`]: Time source handed to the driver
//! - [`format_remaining`]: Display formatting of remaining times
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod format;
pub mod storage;
pub mod timer;
pub mod trigger;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{BindingError, ConfigError, CoreError};
pub use events::Event;
pub use format::{format_duration, format_remaining};
pub use storage::{BindingsConfig, Config, DisplayConfig};
pub use timer::{GroupState, Phases, SharedTimerGroup, Timer, TimerGroup, TimerKind, TimerReading};
pub use trigger::{Action, Bindings, Key, KeyPhase, KeyStroke, Modifiers, Trigger};
