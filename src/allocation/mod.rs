//! The allocation core: club identity, submissions and their acceptance
//! rules, priority ranking, the seat ledger, and the round-based engine.

pub mod club;
pub mod engine;
pub mod ranking;
pub mod roster;
pub mod submission;

pub use club::{Club, ClubDay};
pub use engine::{AllocationEngine, AllocationOutcome};
pub use ranking::{rank, PriorityOverrides};
pub use roster::{SeatKey, SeatLedger};
pub use submission::{PupilId, Submission, Term};
