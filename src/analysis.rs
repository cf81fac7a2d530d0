//! Blur analysis normalization.
//!
//! The native blur detection capability is invoked identically in spirit
//! on both platforms but answers through two structurally different
//! callback contracts. This module adapts both into one uniform async
//! operation and normalizes the implicit truthiness of the native payload
//! into an explicit boolean at the adapter boundary, so the ambiguous raw
//! value never leaks further.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::encode::EncodedImage;
use crate::host::{AndroidBlurModule, IosBlurModule};

/// Raw value delivered by the native module.
///
/// The native contract encodes blurriness as an implicit truthiness
/// signal, not a literal boolean, so the payload type cannot be assumed.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl NativeValue {
    /// The human-readable message carried by this value.
    pub fn message(&self) -> String {
        match self {
            NativeValue::Text(s) => s.clone(),
            NativeValue::Number(n) => n.to_string(),
            NativeValue::Bool(b) => b.to_string(),
            NativeValue::Null => String::new(),
        }
    }
}

/// How native truthiness maps to "blurry".
///
/// The convention is inferred from usage rather than documented by the
/// native collaborator, so the numeric cutoff is kept configurable
/// instead of hard-coded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurConvention {
    /// Numbers with absolute value strictly above this count as blurry.
    pub numeric_threshold: f64,
}

impl Default for BlurConvention {
    fn default() -> Self {
        // Non-zero means blurry.
        Self {
            numeric_threshold: 0.0,
        }
    }
}

impl BlurConvention {
    pub fn with_threshold(numeric_threshold: f64) -> Self {
        Self { numeric_threshold }
    }

    /// Apply the truthiness convention to a native value.
    pub fn is_blurry(&self, value: &NativeValue) -> bool {
        match value {
            NativeValue::Text(s) => !s.is_empty(),
            NativeValue::Number(n) => n.abs() > self.numeric_threshold,
            NativeValue::Bool(b) => *b,
            NativeValue::Null => false,
        }
    }
}

/// The normalized outcome of blur analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct BlurVerdict {
    /// Explicit decision extracted from the native truthiness signal.
    pub is_blurry: bool,
    /// The native diagnostic message, verbatim.
    pub raw_message: String,
}

impl BlurVerdict {
    /// Normalize a native value under the given convention.
    pub fn from_native(value: &NativeValue, convention: BlurConvention) -> Self {
        Self {
            is_blurry: convention.is_blurry(value),
            raw_message: value.message(),
        }
    }

    /// The user-visible verdict line shown on the review screen.
    pub fn display_message(&self) -> String {
        if self.is_blurry {
            format!("{} Photo is blurred!", self.raw_message)
        } else {
            format!("{} Photo is clear!", self.raw_message)
        }
    }
}

/// Errors that can occur during blur analysis.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The native module signaled an error; the payload passes through
    /// unaltered.
    #[error("{0}")]
    Native(String),

    /// The native module reported success but delivered no result value.
    #[error("analysis returned no result")]
    EmptyResult,

    /// The native module dropped both callbacks without invoking either.
    #[error("analysis completed without a result callback")]
    Abandoned,
}

/// Uniform async blur analysis capability.
///
/// Exactly one implementation is selected at startup based on the host
/// platform; callers never see which callback contract sits underneath.
#[async_trait]
pub trait BlurDetector: Send + Sync {
    async fn analyze(&self, image: &EncodedImage) -> Result<BlurVerdict, AnalysisError>;
}

type NativeOutcome = Result<NativeValue, AnalysisError>;

/// Shared slot letting exactly one of two callbacks settle the outcome.
fn outcome_slot(
    tx: oneshot::Sender<NativeOutcome>,
) -> Arc<Mutex<Option<oneshot::Sender<NativeOutcome>>>> {
    Arc::new(Mutex::new(Some(tx)))
}

fn settle(
    slot: &Mutex<Option<oneshot::Sender<NativeOutcome>>>,
    outcome: NativeOutcome,
) {
    let sender = slot
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    if let Some(tx) = sender {
        // A dropped receiver means the session abandoned this analysis.
        let _ = tx.send(outcome);
    }
}

/// Adapter over the Android contract: separate error/success callbacks.
pub struct AndroidBlurDetector {
    module: Arc<dyn AndroidBlurModule>,
    convention: BlurConvention,
}

impl AndroidBlurDetector {
    pub fn new(module: Arc<dyn AndroidBlurModule>, convention: BlurConvention) -> Self {
        Self { module, convention }
    }
}

#[async_trait]
impl BlurDetector for AndroidBlurDetector {
    async fn analyze(&self, image: &EncodedImage) -> Result<BlurVerdict, AnalysisError> {
        let (tx, rx) = oneshot::channel();
        let slot = outcome_slot(tx);
        let error_slot = Arc::clone(&slot);
        let success_slot = Arc::clone(&slot);

        self.module.check_for_blurry_image(
            image.as_str(),
            Box::new(move |err| settle(&error_slot, Err(AnalysisError::Native(err)))),
            Box::new(move |value| settle(&success_slot, Ok(value))),
        );

        let value = rx.await.map_err(|_| AnalysisError::Abandoned)??;
        Ok(BlurVerdict::from_native(&value, self.convention))
    }
}

/// Adapter over the iOS contract: one `(error, results)` completion.
pub struct IosBlurDetector {
    module: Arc<dyn IosBlurModule>,
    convention: BlurConvention,
}

impl IosBlurDetector {
    pub fn new(module: Arc<dyn IosBlurModule>, convention: BlurConvention) -> Self {
        Self { module, convention }
    }
}

#[async_trait]
impl BlurDetector for IosBlurDetector {
    async fn analyze(&self, image: &EncodedImage) -> Result<BlurVerdict, AnalysisError> {
        let (tx, rx) = oneshot::channel();
        let slot = outcome_slot(tx);

        self.module.check_for_blurry_image(
            image.as_str(),
            Box::new(move |error, results| {
                let outcome = match error {
                    Some(err) => Err(AnalysisError::Native(err)),
                    // The verdict is the first element; the rest of the
                    // sequence is ignored.
                    None => results
                        .into_iter()
                        .next()
                        .ok_or(AnalysisError::EmptyResult),
                };
                settle(&slot, outcome);
            }),
        );

        let value = rx.await.map_err(|_| AnalysisError::Abandoned)??;
        Ok(BlurVerdict::from_native(&value, self.convention))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness_text() {
        let convention = BlurConvention::default();
        assert!(convention.is_blurry(&NativeValue::Text("Blurry".into())));
        assert!(!convention.is_blurry(&NativeValue::Text(String::new())));
    }

    #[test]
    fn test_truthiness_number_default_threshold() {
        let convention = BlurConvention::default();
        assert!(convention.is_blurry(&NativeValue::Number(1.0)));
        assert!(convention.is_blurry(&NativeValue::Number(-3.5)));
        assert!(!convention.is_blurry(&NativeValue::Number(0.0)));
    }

    #[test]
    fn test_truthiness_number_custom_threshold() {
        let convention = BlurConvention::with_threshold(100.0);
        assert!(!convention.is_blurry(&NativeValue::Number(42.0)));
        assert!(convention.is_blurry(&NativeValue::Number(250.0)));
    }

    #[test]
    fn test_truthiness_bool_and_null() {
        let convention = BlurConvention::default();
        assert!(convention.is_blurry(&NativeValue::Bool(true)));
        assert!(!convention.is_blurry(&NativeValue::Bool(false)));
        assert!(!convention.is_blurry(&NativeValue::Null));
    }

    #[test]
    fn test_verdict_display_message() {
        let blurry = BlurVerdict::from_native(
            &NativeValue::Text("Blurry".into()),
            BlurConvention::default(),
        );
        assert!(blurry.is_blurry);
        assert_eq!(blurry.display_message(), "Blurry Photo is blurred!");

        let clear = BlurVerdict::from_native(
            &NativeValue::Number(0.0),
            BlurConvention::default(),
        );
        assert!(!clear.is_blurry);
        assert_eq!(clear.display_message(), "0 Photo is clear!");
    }

    #[test]
    fn test_verdict_carries_raw_message_verbatim() {
        let verdict = BlurVerdict::from_native(
            &NativeValue::Text("variance 12.7".into()),
            BlurConvention::default(),
        );
        assert_eq!(verdict.raw_message, "variance 12.7");
    }
}
