use std::ffi::{CStr, CString};
use std::os::raw::c_char;

// Core modules
pub mod error;
pub mod platforms;
pub mod robot;
pub mod runtime;
pub mod types;

// Re-exports for convenience
pub use error::{Error, ErrorCode, Result};
pub use platforms::{PlatformDescriptor, Strategies};
pub use robot::{Robot, RobotOptions};
pub use types::{OutboundMessage, Outcome};

// Library version information
pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 1;
pub const VERSION_PATCH: u32 = 0;
pub const VERSION_STRING: &str = concat!(env!("CARGO_PKG_VERSION"), " (librobot)");

/// FFI function: Free a string allocated by this library
#[no_mangle]
pub extern "C" fn robot_free_string(s: *mut c_char) {
    if !s.is_null() {
        unsafe {
            let _ = CString::from_raw(s);
        }
    }
}

/// Borrow a C string as UTF-8
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
unsafe fn borrow_str<'a>(ptr: *const c_char) -> Result<&'a str> {
    if ptr.is_null() {
        return Err(Error::null_pointer());
    }
    CStr::from_ptr(ptr).to_str().map_err(|_| Error::invalid_utf8())
}

/// Record `result` as the last error and convert it to a status code
fn report(result: Result<()>) -> ErrorCode {
    match result {
        Ok(()) => ErrorCode::Success,
        Err(e) => {
            let code = e.code;
            error::set_last_error(e);
            code
        }
    }
}

// ============================================================================
// Library Initialization
// ============================================================================

/// FFI function: Initialize the library
/// This should be called once before sending any message
/// Returns ErrorCode indicating success or failure
#[no_mangle]
pub extern "C" fn robot_init() -> ErrorCode {
    error::clear_last_error();
    report(runtime::init_runtime())
}

/// FFI function: Cleanup the library
/// Frees the global runtime; robots stay valid but cannot send until robot_init is called again
#[no_mangle]
pub extern "C" fn robot_cleanup() {
    error::clear_last_error();
    runtime::shutdown_runtime();
}

/// FFI function: Get the library version string
/// Returns a static string, do NOT free this pointer
#[no_mangle]
pub extern "C" fn robot_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), " (librobot)\0").as_ptr() as *const c_char
}

/// FFI function: Get the major version number
#[no_mangle]
pub extern "C" fn robot_version_major() -> u32 {
    VERSION_MAJOR
}

/// FFI function: Get the minor version number
#[no_mangle]
pub extern "C" fn robot_version_minor() -> u32 {
    VERSION_MINOR
}

/// FFI function: Get the patch version number
#[no_mangle]
pub extern "C" fn robot_version_patch() -> u32 {
    VERSION_PATCH
}

// ============================================================================
// Error Handling FFI
// ============================================================================

/// FFI function: Get the error code of the last error
/// Returns ErrorCode::Success (0) if no error has occurred
#[no_mangle]
pub extern "C" fn robot_last_error_code() -> ErrorCode {
    error::get_last_error()
        .map(|e| e.code)
        .unwrap_or(ErrorCode::Success)
}

/// FFI function: Get the full message of the last error ("Kind: message")
/// Returns a dynamically allocated string that must be freed with robot_free_string()
/// Returns NULL if no error has occurred
#[no_mangle]
pub extern "C" fn robot_last_error_message() -> *mut c_char {
    let error = match error::get_last_error() {
        Some(e) => e,
        None => return std::ptr::null_mut(),
    };

    match CString::new(error.to_string()) {
        Ok(c_string) => c_string.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// FFI function: Clear the last error
#[no_mangle]
pub extern "C" fn robot_clear_error() {
    error::clear_last_error();
}

// ============================================================================
// Robot FFI - Opaque Handle Pattern
// ============================================================================

/// Opaque handle to a Robot object
pub type RobotHandle = *mut Robot;

/// FFI function: Create a robot for a platform
/// Returns an opaque handle that must be freed with robot_destroy()
/// Returns NULL on error; the reason is available through robot_last_error_*()
#[no_mangle]
pub extern "C" fn robot_create(platform: *const c_char, token: *const c_char) -> RobotHandle {
    error::clear_last_error();

    let created = unsafe { borrow_str(platform).and_then(|p| Ok((p, borrow_str(token)?))) }
        .and_then(|(platform, token)| Robot::new(platform, token));

    match created {
        Ok(robot) => Box::into_raw(Box::new(robot)),
        Err(e) => {
            error::set_last_error(e);
            std::ptr::null_mut()
        }
    }
}

/// FFI function: Send a text message
/// Blocks until the webhook answers or the request times out
#[no_mangle]
pub extern "C" fn robot_send_text(handle: RobotHandle, content: *const c_char) -> ErrorCode {
    error::clear_last_error();

    if handle.is_null() {
        return report(Err(Error::null_pointer()));
    }

    let robot = unsafe { &*handle };
    let result = unsafe { borrow_str(content) }
        .and_then(|content| runtime::block_on(robot.send_text_message(content))?);
    report(result)
}

/// FFI function: Send a markdown message
/// Blocks until the webhook answers or the request times out
#[no_mangle]
pub extern "C" fn robot_send_markdown(
    handle: RobotHandle,
    title: *const c_char,
    text: *const c_char,
) -> ErrorCode {
    error::clear_last_error();

    if handle.is_null() {
        return report(Err(Error::null_pointer()));
    }

    let robot = unsafe { &*handle };
    let result = unsafe { borrow_str(title).and_then(|t| Ok((t, borrow_str(text)?))) }
        .and_then(|(title, text)| runtime::block_on(robot.send_markdown_message(title, text))?);
    report(result)
}

/// FFI function: Destroy a robot and free its memory
/// After calling this, the handle is invalid and must not be used
#[no_mangle]
pub extern "C" fn robot_destroy(handle: RobotHandle) {
    if !handle.is_null() {
        unsafe {
            let _ = Box::from_raw(handle);
        }
    }
}
