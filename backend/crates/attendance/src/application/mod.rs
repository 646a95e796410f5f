//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.

pub mod config;
pub mod create_session;
pub mod query_records;
pub mod verify_attendance;

pub use create_session::{CreateSessionInput, CreateSessionUseCase};
pub use query_records::{QueryRecordsUseCase, SessionView};
pub use verify_attendance::{VerifyAttendanceInput, VerifyAttendanceUseCase};
