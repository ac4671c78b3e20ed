//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use imaginary_core::{ConfigKey, ImaginaryError, RequestBuilder};

/// Opaque handle to a `Client`. C callers receive a pointer to this and pass
/// it back into every FFI function.
pub struct FfiClient {
    pub(crate) inner: imaginary_core::Client,
}

/// Opaque handle to the active request builder, only valid for the duration
/// of a macro callback.
pub struct FfiBuilder {
    pub(crate) inner: *mut RequestBuilder,
}

impl FfiBuilder {
    /// Borrow the core builder behind a handle. `None` if either pointer is
    /// null.
    pub(crate) fn resolve<'a>(handle: *mut FfiBuilder) -> Option<&'a mut RequestBuilder> {
        let handle = unsafe { handle.as_mut() }?;
        unsafe { handle.inner.as_mut() }
    }
}

/// Macro callback. Receives the active builder, the invoke arguments as C
/// strings and the `user_data` pointer given to `imaginary_define`.
pub type FfiMacroFn = extern "C" fn(
    builder: *mut FfiBuilder,
    args: *const *const c_char,
    args_len: u32,
    user_data: *mut c_void,
);

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A GET request described as C-compatible plain data.
#[repr(C)]
pub struct FfiHttpRequest {
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: imaginary_core::HttpRequest) -> *mut Self {
        let url = to_c_string(req.url);

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Vec<FfiHeader> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: to_c_string(k),
                    value: to_c_string(v),
                })
                .collect();
            let mut ffi_headers = ffi_headers.into_boxed_slice();
            let ptr = ffi_headers.as_mut_ptr();
            std::mem::forget(ffi_headers);
            ptr
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            url,
            headers,
            headers_len,
        }))
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned across the boundary.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    MissingUrl = 1,
    MissingClient = 2,
    DefinitionNotFound = 3,
    NoActiveRequest = 4,
    MissingArgument = 5,
    NotFound = 6,
    Http = 7,
    Deserialization = 8,
    Panic = 9,
    NullArg = 10,
}

impl From<&ImaginaryError> for FfiErrorCode {
    fn from(err: &ImaginaryError) -> Self {
        match err {
            ImaginaryError::MissingConfiguration(ConfigKey::Url) => FfiErrorCode::MissingUrl,
            ImaginaryError::MissingConfiguration(ConfigKey::Client) => FfiErrorCode::MissingClient,
            ImaginaryError::DefinitionNotFound(_) => FfiErrorCode::DefinitionNotFound,
            ImaginaryError::NoActiveRequest => FfiErrorCode::NoActiveRequest,
            ImaginaryError::MissingArgument { .. } => FfiErrorCode::MissingArgument,
            ImaginaryError::NotFound => FfiErrorCode::NotFound,
            ImaginaryError::Http { .. } => FfiErrorCode::Http,
            ImaginaryError::Deserialization(_) => FfiErrorCode::Deserialization,
        }
    }
}

/// Result envelope for `imaginary_url`.
///
/// On success `error_code` is `Ok`, `error_message` is null and `url` holds
/// the rendered URL. On failure `url` is null and `error_message` is a
/// human-readable C string.
#[repr(C)]
pub struct FfiUrlResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub url: *mut c_char,
}

impl FfiUrlResult {
    pub(crate) fn ok(url: String) -> *mut Self {
        Box::into_raw(Box::new(FfiUrlResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            url: to_c_string(url),
        }))
    }

    pub(crate) fn from_error(err: ImaginaryError) -> *mut Self {
        Self::failure(FfiErrorCode::from(&err), &err.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, &format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg)
    }

    fn failure(error_code: FfiErrorCode, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiUrlResult {
            error_code,
            error_message: to_c_string(msg.to_string()),
            url: std::ptr::null_mut(),
        }))
    }
}

/// Convert to an owned C string, dropping interior NUL bytes.
pub(crate) fn to_c_string(s: String) -> *mut c_char {
    let bytes: Vec<u8> = s.into_bytes().into_iter().filter(|b| *b != 0).collect();
    CString::new(bytes).unwrap_or_default().into_raw()
}
