//! Resource URL checking: trust fast path and live HTTP probing.

pub mod liveness;
pub mod probe;
pub mod trust;

pub use liveness::{CheckerConfig, LivenessChecker, Verdict};
pub use probe::{ProbeError, ProbeMethod, ProbeResponse, ReqwestProbe, UrlProbe};
pub use trust::is_trusted;
