//! Exit codes for failuresensectl

use failuresense_shared::FailureKind;

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when the telemetry reading fails validation
pub const EXIT_INVALID_INPUT: i32 = 64;

/// Exit code when the service returns an unreadable body
pub const EXIT_INVALID_RESPONSE: i32 = 65;

/// Exit code when the service rejects the request
pub const EXIT_SERVICE_ERROR: i32 = 69;

/// Exit code when the service is unreachable
pub const EXIT_SERVICE_UNAVAILABLE: i32 = 70;

pub fn exit_code_for(kind: FailureKind) -> i32 {
    match kind {
        FailureKind::Connectivity => EXIT_SERVICE_UNAVAILABLE,
        FailureKind::Service => EXIT_SERVICE_ERROR,
        FailureKind::Parse => EXIT_INVALID_RESPONSE,
    }
}
