pub mod session;

pub use session::{
    CycleReport, ScanSession, SessionConfig, SessionError, SessionSnapshot, SessionState,
    Termination,
};
