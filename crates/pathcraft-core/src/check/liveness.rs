//! Bounded-retry liveness check for a single URL.
//!
//! A check never fails: every path resolves to a [`Verdict`]. HEAD is
//! tried first; origins that answer HEAD with 403/405 get one GET fallback
//! on the final attempt. Non-ok statuses and transport errors are retried
//! with linearly increasing backoff. On exhaustion, an HTTP status is
//! reported as rejection, while a transient transport failure resolves
//! leniently (configurable) -- a flaky validator-side network should not
//! cost the user a resource.

use std::sync::Arc;
use std::time::Duration;

use super::probe::{ProbeError, ProbeMethod, UrlProbe};

/// Outcome of checking one URL.
///
/// `Lenient` is deliberately distinct from `Confirmed` so callers and
/// tests can tell a genuine confirmation from a leniency pass-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Allow-listed domain; no network call was made.
    Trusted,
    /// A probe returned a 2xx status.
    Confirmed { status: u16 },
    /// Probing kept failing at the transport layer; kept by policy.
    Lenient { note: String },
    /// The URL could not be confirmed.
    Rejected {
        status: Option<u16>,
        error: Option<String>,
    },
}

impl Verdict {
    /// Whether the resource should be kept.
    pub fn is_valid(&self) -> bool {
        !matches!(self, Verdict::Rejected { .. })
    }
}

/// Tunables for a [`LivenessChecker`].
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Retries after the first attempt (2 means up to 3 attempts).
    pub retries: u32,
    /// Backoff grows linearly: attempt index times this unit.
    pub backoff_unit: Duration,
    /// Treat transient transport failures as passing on exhaustion.
    /// Whether that is right is a product decision, hence a flag.
    pub lenient_on_transport_error: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            retries: 2,
            backoff_unit: Duration::from_secs(1),
            lenient_on_transport_error: true,
        }
    }
}

/// Performs liveness checks through an injected [`UrlProbe`].
#[derive(Clone)]
pub struct LivenessChecker {
    probe: Arc<dyn UrlProbe>,
    config: CheckerConfig,
}

impl LivenessChecker {
    pub fn new(probe: Arc<dyn UrlProbe>, config: CheckerConfig) -> Self {
        Self { probe, config }
    }

    /// Check a single URL, resolving to a verdict after at most
    /// `retries + 1` attempts. Never returns an error.
    pub async fn check(&self, url: &str) -> Verdict {
        let retries = self.config.retries;
        let mut last_error: Option<ProbeError> = None;
        let mut last_status: Option<u16> = None;

        for attempt in 0..=retries {
            let final_attempt = attempt == retries;

            match self.probe.request(ProbeMethod::Head, url).await {
                Ok(response) if response.is_ok() => {
                    tracing::debug!(url, status = response.status, "url confirmed");
                    return Verdict::Confirmed {
                        status: response.status,
                    };
                }
                Ok(response) => {
                    // Some origins reject HEAD outright; give GET one shot
                    // before giving up.
                    if matches!(response.status, 403 | 405) && final_attempt {
                        tracing::debug!(url, status = response.status, "HEAD blocked, trying GET");
                        if let Ok(get_response) = self.probe.request(ProbeMethod::Get, url).await {
                            if get_response.is_ok() {
                                tracing::debug!(
                                    url,
                                    status = get_response.status,
                                    "url confirmed via GET fallback"
                                );
                                return Verdict::Confirmed {
                                    status: get_response.status,
                                };
                            }
                        }
                    }
                    tracing::debug!(
                        url,
                        status = response.status,
                        attempt = attempt + 1,
                        attempts_max = retries + 1,
                        "url returned non-ok status"
                    );
                    last_status = Some(response.status);
                    last_error = None;
                }
                Err(err) => {
                    tracing::debug!(
                        url,
                        error = %err,
                        attempt = attempt + 1,
                        attempts_max = retries + 1,
                        "url probe failed"
                    );
                    last_status = None;
                    last_error = Some(err);
                }
            }

            if !final_attempt {
                tokio::time::sleep(self.config.backoff_unit * (attempt + 1)).await;
            }
        }

        match (last_status, last_error) {
            (Some(status), _) => Verdict::Rejected {
                status: Some(status),
                error: None,
            },
            (None, Some(err)) => {
                if self.config.lenient_on_transport_error && err.is_transient() {
                    Verdict::Lenient {
                        note: err.to_string(),
                    }
                } else {
                    Verdict::Rejected {
                        status: None,
                        error: Some(err.to_string()),
                    }
                }
            }
            // retries is unsigned, so the loop body ran at least once and
            // set one of the two.
            (None, None) => Verdict::Rejected {
                status: None,
                error: Some("no probe attempt completed".to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    // Import the externally built crate rather than `super::*` so these
    // types match the crate instance the test-utils mocks implement.
    use pathcraft_core::check::{CheckerConfig, LivenessChecker, Verdict};
    use pathcraft_test_utils::{ProbeScript, RecordingProbe};
    use std::sync::Arc;

    fn checker(probe: RecordingProbe) -> (LivenessChecker, Arc<RecordingProbe>) {
        let probe = Arc::new(probe);
        (
            LivenessChecker::new(probe.clone(), CheckerConfig::default()),
            probe,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn ok_on_first_head_uses_exactly_one_call() {
        let (checker, probe) = checker(RecordingProbe::new(ProbeScript::status(200)));

        let verdict = checker.check("https://example.com/course").await;

        assert_eq!(verdict, Verdict::Confirmed { status: 200 });
        assert_eq!(probe.head_calls(), 1);
        assert_eq!(probe.get_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn head_403_falls_back_to_get_only_on_final_attempt() {
        let script = ProbeScript::status(403).with_get_status(200);
        let (checker, probe) = checker(RecordingProbe::new(script));

        let verdict = checker.check("https://example.com/blocks-head").await;

        assert_eq!(verdict, Verdict::Confirmed { status: 200 });
        // retries=2 => three HEAD attempts; GET happens once, on the last.
        assert_eq!(probe.head_calls(), 3);
        assert_eq!(probe.get_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn head_405_with_failing_get_is_rejected_with_head_status() {
        let script = ProbeScript::status(405).with_get_status(404);
        let (checker, probe) = checker(RecordingProbe::new(script));

        let verdict = checker.check("https://example.com/gone").await;

        assert_eq!(
            verdict,
            Verdict::Rejected {
                status: Some(405),
                error: None,
            }
        );
        assert_eq!(probe.get_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_404_rejects_after_all_attempts() {
        let (checker, probe) = checker(RecordingProbe::new(ProbeScript::status(404)));

        let verdict = checker.check("https://example.com/missing").await;

        assert_eq!(
            verdict,
            Verdict::Rejected {
                status: Some(404),
                error: None,
            }
        );
        // Total attempts == retries + 1.
        assert_eq!(probe.head_calls(), 3);
        assert_eq!(probe.get_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_exhaustion_resolves_leniently_by_default() {
        let (checker, probe) = checker(RecordingProbe::new(ProbeScript::timeout()));

        let verdict = checker.check("https://slow.example.com/").await;

        assert!(
            matches!(verdict, Verdict::Lenient { .. }),
            "expected lenient pass-through, got: {verdict:?}"
        );
        assert!(verdict.is_valid());
        assert_eq!(probe.head_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn strict_policy_rejects_timeouts() {
        let probe = Arc::new(RecordingProbe::new(ProbeScript::timeout()));
        let config = CheckerConfig {
            lenient_on_transport_error: false,
            ..CheckerConfig::default()
        };
        let checker = LivenessChecker::new(probe, config);

        let verdict = checker.check("https://slow.example.com/").await;

        assert!(
            matches!(verdict, Verdict::Rejected { status: None, error: Some(_) }),
            "expected rejection under strict policy, got: {verdict:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn bad_request_error_is_rejected_even_when_lenient() {
        let script = ProbeScript::error_bad_request("unsupported scheme");
        let (checker, _probe) = checker(RecordingProbe::new(script));

        let verdict = checker.check("ftp://example.com/file").await;

        assert!(!verdict.is_valid(), "got: {verdict:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_when_a_retry_succeeds() {
        let script = ProbeScript::statuses(&[500, 200]);
        let (checker, probe) = checker(RecordingProbe::new(script));

        let verdict = checker.check("https://flaky.example.com/").await;

        assert_eq!(verdict, Verdict::Confirmed { status: 200 });
        assert_eq!(probe.head_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_error_then_success_confirms() {
        let script = ProbeScript::timeout_then_status(200);
        let (checker, probe) = checker(RecordingProbe::new(script));

        let verdict = checker.check("https://flaky.example.com/").await;

        assert_eq!(verdict, Verdict::Confirmed { status: 200 });
        assert_eq!(probe.head_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_retries_means_single_attempt() {
        let probe = Arc::new(RecordingProbe::new(ProbeScript::status(404)));
        let config = CheckerConfig {
            retries: 0,
            ..CheckerConfig::default()
        };
        let checker = LivenessChecker::new(probe.clone(), config);

        let verdict = checker.check("https://example.com/missing").await;

        assert!(!verdict.is_valid());
        assert_eq!(probe.head_calls(), 1);
    }

    #[test]
    fn trusted_and_lenient_verdicts_are_valid() {
        assert!(Verdict::Trusted.is_valid());
        assert!(Verdict::Confirmed { status: 204 }.is_valid());
        assert!(
            Verdict::Lenient {
                note: "request timed out".to_string()
            }
            .is_valid()
        );
        assert!(
            !Verdict::Rejected {
                status: Some(404),
                error: None
            }
            .is_valid()
        );
    }
}
