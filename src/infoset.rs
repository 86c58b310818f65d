use std::sync::OnceLock;

use crate::errors::EngineError;

/// Tag value carried by every trace artifact produced under order-unknown
/// constraints. Artifacts without it are rejected by the runtime trace
/// server.
pub const INFO_SET_ORDER_UNKNOWN: &str = "order_unknown";

/// Which information sets this process may open.
///
/// Runtime code paths observe no artifact of draw order; calibration code
/// paths may read the ordered deck. The tag is process-wide and immutable
/// once declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextTag {
    Runtime,
    Calibration,
}

static PROCESS_CONTEXT: OnceLock<ContextTag> = OnceLock::new();

/// Declare the process-wide context. The first declaration wins; a later
/// conflicting declaration is an information-set violation.
pub fn declare_context(tag: ContextTag) -> Result<(), EngineError> {
    let current = PROCESS_CONTEXT.get_or_init(|| tag);
    if *current == tag {
        Ok(())
    } else {
        Err(EngineError::CalibrationComponentInRuntime)
    }
}

/// The effective context: `Runtime` unless calibration was declared.
#[inline]
pub fn current_context() -> ContextTag {
    PROCESS_CONTEXT.get().copied().unwrap_or(ContextTag::Runtime)
}

/// Capability token required to observe draw order. Only obtainable in a
/// process that declared the calibration context; runtime acquisition is
/// the `calibration_component_in_runtime` violation.
#[derive(Debug)]
pub struct PrivilegedContext {
    _guard: (),
}

impl PrivilegedContext {
    pub fn acquire() -> Result<PrivilegedContext, EngineError> {
        match current_context() {
            ContextTag::Calibration => Ok(PrivilegedContext { _guard: () }),
            ContextTag::Runtime => Err(EngineError::CalibrationComponentInRuntime),
        }
    }
}
