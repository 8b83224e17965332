pub const SUCCESS: i32 = 0;
/// Bad arguments, unreadable input or invalid configuration
pub const INPUT_ERROR: i32 = 2;
/// Design, filtering or output failure
pub const EXECUTION_ERROR: i32 = 3;

/// Exit code for a library error
pub fn for_error(err: &notch_rs::NotchError) -> i32 {
    if err.is_usage_error() {
        INPUT_ERROR
    } else {
        EXECUTION_ERROR
    }
}
