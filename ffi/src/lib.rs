//! C-ABI wrapper around `imaginary-core`.
//!
//! # Overview
//! Exposes the URL builder through `extern "C"` functions so any language
//! with a C FFI can configure a client, fetch a source, apply manipulations
//! and macros, and read back the rendered URL.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary. The client holds boxed closures, which
//!   are not `RefUnwindSafe`, hence `AssertUnwindSafe`.
//! - Macros are C callbacks. They receive an `FfiBuilder` handle that is
//!   only valid during the call, and manipulate it with the
//!   `imaginary_builder_*` functions.
//! - Invoke arguments arrive as C strings and are forwarded as text values.
//! - The C caller owns all returned pointers and must call the matching
//!   `imaginary_free_*` function to release them.

pub mod types;

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use imaginary_core::{Config, Value};

use types::*;

/// Copy a nullable C string into an owned `String`.
///
/// Invalid UTF-8 is replaced rather than rejected.
fn read_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

/// Copy `argc` C strings from `argv`. Returns `None` if any pointer is null.
fn read_args(argv: *const *const c_char, argc: u32) -> Option<Vec<Value>> {
    if argc == 0 {
        return Some(Vec::new());
    }
    if argv.is_null() {
        return None;
    }
    let ptrs = unsafe { std::slice::from_raw_parts(argv, argc as usize) };
    ptrs.iter().map(|p| read_str(*p).map(Value::Text)).collect()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new client. Either argument may be null; missing configuration
/// is only reported when a URL is rendered.
///
/// Returns null only if an internal panic occurs.
/// The caller must free the returned pointer with `imaginary_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn imaginary_client_new(url: *const c_char, client: *const c_char) -> *mut FfiClient {
    catch_unwind(|| {
        let config = Config {
            url: read_str(url),
            client: read_str(client),
        };
        let client = imaginary_core::Client::new(config);
        Box::into_raw(Box::new(FfiClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a new client from a JSON object with optional `url` and `client`
/// keys.
///
/// Returns null if `json` is null or not a valid configuration object.
#[unsafe(no_mangle)]
pub extern "C" fn imaginary_client_from_json(json: *const c_char) -> *mut FfiClient {
    catch_unwind(|| {
        let Some(raw) = read_str(json) else {
            return std::ptr::null_mut();
        };
        match Config::from_json(&raw) {
            Ok(config) => Box::into_raw(Box::new(FfiClient {
                inner: imaginary_core::Client::new(config),
            })),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `imaginary_client_new` or
/// `imaginary_client_from_json`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn imaginary_client_free(client: *mut FfiClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(client) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Request building
// ---------------------------------------------------------------------------

/// Start a new request for `source`, discarding the previous one.
#[unsafe(no_mangle)]
pub extern "C" fn imaginary_fetch(client: *mut FfiClient, source: *const c_char) -> FfiErrorCode {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiErrorCode::NullArg;
        }
        let Some(source) = read_str(source) else {
            return FfiErrorCode::NullArg;
        };
        let client = unsafe { &mut *client };
        client.inner.fetch(source);
        FfiErrorCode::Ok
    }))
    .unwrap_or(FfiErrorCode::Panic)
}

/// Register `callback` as a macro under `name`, replacing any earlier one.
///
/// `user_data` is passed back to every call and is never dereferenced here.
#[unsafe(no_mangle)]
pub extern "C" fn imaginary_define(
    client: *mut FfiClient,
    name: *const c_char,
    callback: Option<FfiMacroFn>,
    user_data: *mut c_void,
) -> FfiErrorCode {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiErrorCode::NullArg;
        }
        let (Some(name), Some(callback)) = (read_str(name), callback) else {
            return FfiErrorCode::NullArg;
        };
        let client = unsafe { &mut *client };
        client.inner.define(name, move |builder, args| {
            let owned: Vec<CString> = args
                .iter()
                .map(|a| CString::new(a.to_string().replace('\0', "")).unwrap_or_default())
                .collect();
            let ptrs: Vec<*const c_char> = owned.iter().map(|s| s.as_ptr()).collect();
            let mut handle = FfiBuilder {
                inner: builder as *mut _,
            };
            callback(
                &mut handle,
                ptrs.as_ptr(),
                ptrs.len() as u32,
                user_data,
            );
        });
        FfiErrorCode::Ok
    }))
    .unwrap_or(FfiErrorCode::Panic)
}

/// Call a built-in operation or macro by name on the active request.
///
/// `argv` may be null when `argc` is 0.
#[unsafe(no_mangle)]
pub extern "C" fn imaginary_invoke(
    client: *mut FfiClient,
    name: *const c_char,
    argv: *const *const c_char,
    argc: u32,
) -> FfiErrorCode {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiErrorCode::NullArg;
        }
        let (Some(name), Some(args)) = (read_str(name), read_args(argv, argc)) else {
            return FfiErrorCode::NullArg;
        };
        let client = unsafe { &mut *client };
        match client.inner.invoke(&name, &args) {
            Ok(_) => FfiErrorCode::Ok,
            Err(e) => FfiErrorCode::from(&e),
        }
    }))
    .unwrap_or(FfiErrorCode::Panic)
}

// ---------------------------------------------------------------------------
// Builder functions (valid inside macro callbacks)
// ---------------------------------------------------------------------------

/// Set the width. Ignored if `builder` is null.
#[unsafe(no_mangle)]
pub extern "C" fn imaginary_builder_width(builder: *mut FfiBuilder, width: u32) {
    if let Some(builder) = FfiBuilder::resolve(builder) {
        builder.width(width);
    }
}

/// Set the height. Ignored if `builder` is null.
#[unsafe(no_mangle)]
pub extern "C" fn imaginary_builder_height(builder: *mut FfiBuilder, height: u32) {
    if let Some(builder) = FfiBuilder::resolve(builder) {
        builder.height(height);
    }
}

/// Fit when resizing. `gravity` may be null.
#[unsafe(no_mangle)]
pub extern "C" fn imaginary_builder_fit(builder: *mut FfiBuilder, gravity: *const c_char) {
    if let Some(builder) = FfiBuilder::resolve(builder) {
        builder.fit(read_str(gravity).as_deref());
    }
}

/// Mask with a circle. A null `radius` means `max`.
#[unsafe(no_mangle)]
pub extern "C" fn imaginary_builder_circle(builder: *mut FfiBuilder, radius: *const c_char) {
    if let Some(builder) = FfiBuilder::resolve(builder) {
        match read_str(radius) {
            Some(radius) => builder.circle(radius),
            None => builder.circle_max(),
        };
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the URL for the active request.
///
/// The caller must free the result with `imaginary_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn imaginary_url(client: *const FfiClient) -> *mut FfiUrlResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiUrlResult::null_arg("client");
        }
        let client = unsafe { &*client };
        match client.inner.url() {
            Ok(url) => FfiUrlResult::ok(url),
            Err(e) => FfiUrlResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiUrlResult::panic("panic in imaginary_url"))
}

/// Build the GET request for the active request.
///
/// Returns null if `client` is null or the URL cannot be rendered; call
/// `imaginary_url` for the error detail.
#[unsafe(no_mangle)]
pub extern "C" fn imaginary_build_request(client: *const FfiClient) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match client.inner.build_request() {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiUrlResult` returned by `imaginary_url`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn imaginary_free_result(result: *mut FfiUrlResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        free_c_string(result.url);
    });
}

/// Free an `FfiHttpRequest` returned by `imaginary_build_request`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn imaginary_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.url);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
