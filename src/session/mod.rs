//! Seeding: discovering an initial host population from well-known seed nodes.
//!
//! A [SeedSession] contacts every configured seed concurrently. Each seed is driven through its
//! own [SeedState] machine and reports through its own single-signal `Join`, which forwards to
//! a top-level `Join` over all seeds. When the last seed reports, the session compares the host
//! set size against its size at start and completes once.
mod pipeline;
mod seeder;
mod session;

pub use pipeline::{SeedEvent, SeedState};
pub use seeder::{GetStatus, Seeder, SeederStatus};
pub use session::{SeedSession, SessionState, Stages, Timeouts};
