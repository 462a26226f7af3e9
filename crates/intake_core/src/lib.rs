//! Command intake for a teleoperated robot: single-flight planner submission,
//! prompt lifecycle, status reporting and direct goal publication.

pub mod bootstrap;
pub mod config;
pub mod dispatcher;
pub mod gate;
pub mod guard;
pub mod planner;
pub mod sources;
pub mod status;
pub mod surface;

pub use bootstrap::{run_bootstrap, AutoStart, BootstrapPlan, BootstrapTarget};
pub use config::{load_settings, Settings, SettingsError};
pub use dispatcher::{DispatchError, DispatchOutcome, SubmissionDispatcher};
pub use gate::{ConnectionHandle, DirectPublishGate, PublishOutcome, DEFAULT_GOAL_TOPIC};
pub use guard::InputLifecycleGuard;
pub use planner::{HttpPlanner, MissingPlanner, PlanAck, PlannerClient, PlannerError};
pub use sources::{CommandIntake, KeyChord, QuickAction, Trigger, TriggerOutcome};
pub use status::StatusChannel;
pub use surface::{PromptField, PromptSnapshot, UiSurface};
