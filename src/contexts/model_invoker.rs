//! Retrying invocation of a remote generation call.
//!
//! The invoker wraps one opaque remote call with bounded retries and
//! exponential backoff, and owns the truncation heuristic: a response whose
//! length approaches the per-call token ceiling is returned as-is, flagged
//! truncated, instead of consuming further retries.

use log::{error, info, warn};
use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

/// One request to the remote generation boundary.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: usize,
}

/// Failure of the underlying remote call (network, auth, throttling).
/// Every variant is retryable; exhaustion of the retry budget is what turns
/// a transport failure into a fatal [`CallExhausted`].
#[derive(Debug, Clone)]
pub enum TransportError {
    Network(String),
    Api { status: u16, message: String },
    MalformedResponse(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransportError::Network(details) => {
                write!(f, "Network failure during model call: {}", details)
            }
            TransportError::Api { status, message } => {
                write!(f, "Model API returned status {}: {}", status, message)
            }
            TransportError::MalformedResponse(details) => {
                write!(f, "Model response could not be parsed: {}", details)
            }
        }
    }
}

impl std::error::Error for TransportError {}

/// All retries for one call were consumed. Fatal to the containing stage.
#[derive(Debug)]
pub struct CallExhausted {
    pub attempts: usize,
    pub source: TransportError,
}

impl fmt::Display for CallExhausted {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Model call failed after {} attempt(s): {}",
            self.attempts, self.source
        )
    }
}

impl std::error::Error for CallExhausted {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// The text returned by one successful invocation.
///
/// `truncated` is set when the response length reached 90% of the token
/// ceiling; callers must not assume the text is complete in that case.
#[derive(Debug, Clone)]
pub struct ModelResponse {
    pub text: String,
    pub truncated: bool,
}

/// Outcome of a single attempt, matched on by the retry loop.
enum CallAttempt {
    Complete(String),
    Truncated(String),
    Failed(TransportError),
}

/// The opaque remote generation boundary.
pub trait GenerationCall {
    /// Issue one remote call and return the raw response text.
    fn call(&self, request: &GenerationRequest) -> Result<String, TransportError>;
}

/// Seam for the backoff sleep, so tests can observe durations without
/// actually waiting.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Blocking sleep on the calling thread.
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Invokes a [`GenerationCall`] with bounded retries and exponential
/// backoff (2^attempts seconds, no jitter, no cap).
pub struct ModelInvoker<C, S = ThreadSleeper>
where
    C: GenerationCall,
    S: Sleeper,
{
    client: C,
    max_retries: usize,
    max_tokens_per_call: usize,
    sleeper: S,
}

impl<C> ModelInvoker<C, ThreadSleeper>
where
    C: GenerationCall,
{
    /// Creates an invoker that sleeps on the calling thread during backoff.
    pub fn new(client: C, max_retries: usize, max_tokens_per_call: usize) -> Self {
        Self {
            client,
            max_retries,
            max_tokens_per_call,
            sleeper: ThreadSleeper,
        }
    }
}

impl<C, S> ModelInvoker<C, S>
where
    C: GenerationCall,
    S: Sleeper,
{
    /// Gives access to the underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Creates an invoker with an explicit sleep implementation.
    pub fn with_sleeper(
        client: C,
        max_retries: usize,
        max_tokens_per_call: usize,
        sleeper: S,
    ) -> Self {
        Self {
            client,
            max_retries,
            max_tokens_per_call,
            sleeper,
        }
    }

    /// Issues the call, retrying transport failures until the budget is
    /// spent. A truncated response ends the loop early and is returned
    /// as a partial result, not an error.
    pub fn invoke(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<ModelResponse, CallExhausted> {
        let request = GenerationRequest {
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
            max_tokens: self.max_tokens_per_call,
        };

        let mut retries = 0;
        loop {
            info!(
                "Making model call (attempt {}/{})",
                retries + 1,
                self.max_retries + 1
            );

            match self.attempt(&request) {
                CallAttempt::Complete(text) => {
                    return Ok(ModelResponse {
                        text,
                        truncated: false,
                    });
                }
                CallAttempt::Truncated(text) => {
                    info!("Response truncated at token ceiling; returning partial text");
                    return Ok(ModelResponse {
                        text,
                        truncated: true,
                    });
                }
                CallAttempt::Failed(err) => {
                    retries += 1;
                    if retries <= self.max_retries {
                        // Exponential backoff: 2, 4, 8, ... seconds.
                        let wait = Duration::from_secs(1 << retries);
                        info!("Retrying in {} seconds...", wait.as_secs());
                        self.sleeper.sleep(wait);
                    } else {
                        error!("Maximum retries ({}) exceeded", self.max_retries);
                        return Err(CallExhausted {
                            attempts: retries,
                            source: err,
                        });
                    }
                }
            }
        }
    }

    /// One attempt against the remote boundary, classified for the retry
    /// loop. Truncation is detected by response length reaching 90% of the
    /// token ceiling.
    fn attempt(&self, request: &GenerationRequest) -> CallAttempt {
        let start = Instant::now();

        match self.client.call(request) {
            Ok(text) => {
                let elapsed = start.elapsed().as_secs_f64();
                info!("Model call successful. Elapsed time: {:.2} seconds", elapsed);

                if text.len() >= self.max_tokens_per_call * 9 / 10 {
                    CallAttempt::Truncated(text)
                } else {
                    CallAttempt::Complete(text)
                }
            }
            Err(err) => {
                let elapsed = start.elapsed().as_secs_f64();
                warn!("Model call failed after {:.2} seconds: {}", elapsed, err);
                CallAttempt::Failed(err)
            }
        }
    }
}
