use sevendraw::{declare_context, ContextTag, EngineError, PrivilegedContext};

// A single test keeps the process-wide context transitions deterministic:
// this binary is a runtime process from start to finish.
#[test]
fn runtime_process_cannot_open_the_ordered_information_set() {
    // Undeclared processes default to runtime.
    let err = PrivilegedContext::acquire().expect_err("runtime acquisition must fail");
    assert_eq!(err, EngineError::CalibrationComponentInRuntime);
    assert_eq!(err.message_key(), "error.calibration_component_in_runtime");

    // Declaring runtime is idempotent.
    declare_context(ContextTag::Runtime).expect("runtime declaration");
    declare_context(ContextTag::Runtime).expect("repeat declaration");

    // Once a runtime process, always a runtime process.
    let err = declare_context(ContextTag::Calibration).expect_err("conflicting declaration");
    assert_eq!(err, EngineError::CalibrationComponentInRuntime);

    let err = PrivilegedContext::acquire().expect_err("still runtime");
    assert_eq!(err, EngineError::CalibrationComponentInRuntime);
}
