//! FFI (Foreign Function Interface) layer for C integration
//!
//! Exposes the three content transformations to an editor host written in
//! C (or anything that can call a C ABI).
//!
//! # FFI Boundary Contract
//!
//! ## String Representation
//!
//! **All strings use UTF-8 bytes + length (NOT NUL-terminated C strings)**
//!
//! - Pointer field: `*const u8` / `*mut u8`
//! - Length field: `usize` with `_len` suffix, exact byte count, no NUL
//! - A zero length with a NULL pointer is an empty string
//! - Input that is not valid UTF-8 is rejected with `ERROR_INVALID_INPUT`
//!
//! ## Memory Management
//!
//! - Rust allocates all output memory as `Box<[u8]>`
//! - The caller must release every result with `rte_result_free()`
//! - After the free, all pointers in the result are NULL
//!
//! ```rust
//! use rte_content::ffi::{rte_markdown_to_html, rte_result_free, RteResult};
//! use std::ptr;
//!
//! let markdown = b"# Hello";
//! let mut result = RteResult {
//!     output: ptr::null_mut(),
//!     output_len: 0,
//!     error_code: 0,
//!     error_message: ptr::null_mut(),
//!     error_len: 0,
//! };
//!
//! unsafe { rte_markdown_to_html(markdown.as_ptr(), markdown.len(), &mut result) };
//! assert_eq!(result.error_code, 0);
//! let html = unsafe { std::slice::from_raw_parts(result.output, result.output_len) };
//! assert_eq!(html, b"<h1>Hello</h1>");
//!
//! unsafe { rte_result_free(&mut result) };
//! assert!(result.output.is_null());
//! ```
//!
//! ## Error Handling Contract
//!
//! - Success: `error_code = 0`, `error_message = NULL`, `output` set
//! - Error: `error_code != 0`, `error_message` set, `output = NULL`
//! - Every entry point runs under `catch_unwind`; a panic is reported as
//!   `ERROR_INTERNAL` and never unwinds into the caller
//!
//! ## Thread Safety
//!
//! The entry points keep no state between calls and may be called
//! concurrently from any number of threads.

use std::panic;
use std::ptr;
use std::slice;

use crate::engine::ContentEngine;
use crate::error::ConversionError;
use crate::policy::SanitizationPolicy;

// ============================================================================
// Error Code Constants
// ============================================================================

/// Success - no error occurred
pub const ERROR_SUCCESS: u32 = 0;

/// Markup parsing failed
///
/// Reserved. The bundled html5ever parser never fails and the entry points
/// below never report it; it is the code of [`ConversionError::ParseError`],
/// which a custom [`MarkupParser`](crate::parser::MarkupParser) may return.
pub const ERROR_PARSE: u32 = 1;

/// Invalid input: NULL pointer with non-zero length, or non-UTF-8 bytes
pub const ERROR_INVALID_INPUT: u32 = 5;

/// Internal error, including a caught panic
pub const ERROR_INTERNAL: u32 = 99;

/// Result of a transformation
///
/// # Example Usage (C)
///
/// ```c
/// rte_result_t result;
/// rte_sanitize_html(html, html_len, "p,a,img", 7, &result);
///
/// if (result.error_code == 0) {
///     insert_into_editor(result.output, result.output_len);
/// } else {
///     log_error(result.error_code, result.error_message, result.error_len);
/// }
///
/// rte_result_free(&result);
/// ```
#[repr(C)]
pub struct RteResult {
    /// Output text (UTF-8 bytes, NOT NUL-terminated), NULL on error
    pub output: *mut u8,

    /// Length of output in bytes
    pub output_len: usize,

    /// Error code: 0=success, non-zero=error (see ERROR_* constants)
    pub error_code: u32,

    /// Error message (UTF-8 bytes), NULL on success
    pub error_message: *mut u8,

    /// Length of error message in bytes
    pub error_len: usize,
}

fn reset_result(result: &mut RteResult) {
    result.output = ptr::null_mut();
    result.output_len = 0;
    result.error_code = ERROR_SUCCESS;
    result.error_message = ptr::null_mut();
    result.error_len = 0;
}

fn set_error_result(result: &mut RteResult, error_code: u32, error_message: String) {
    let error_bytes = error_message.into_bytes().into_boxed_slice();
    result.error_code = error_code;
    result.error_len = error_bytes.len();
    result.error_message = Box::into_raw(error_bytes) as *mut u8;
}

fn set_success_result(result: &mut RteResult, output: String) {
    let output_bytes = output.into_bytes().into_boxed_slice();
    result.output_len = output_bytes.len();
    result.output = Box::into_raw(output_bytes) as *mut u8;
    result.error_code = ERROR_SUCCESS;
    result.error_message = ptr::null_mut();
    result.error_len = 0;
}

fn required_utf8<'a>(ptr: *const u8, len: usize, name: &str) -> Result<&'a str, ConversionError> {
    if len == 0 {
        return Ok("");
    }

    if ptr.is_null() {
        return Err(ConversionError::InvalidInput(format!(
            "{name} pointer is NULL"
        )));
    }

    // SAFETY: Pointer was validated as non-NULL above; caller guarantees `len`
    // bytes are valid and readable for the duration of this call.
    let bytes = unsafe { slice::from_raw_parts(ptr, len) };

    std::str::from_utf8(bytes)
        .map_err(|err| ConversionError::InvalidInput(format!("{name} is not valid UTF-8: {err}")))
}

/// Split a comma or whitespace separated tag list
fn parse_tag_list(tags: &str) -> Vec<&str> {
    tags.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|tag| !tag.is_empty())
        .collect()
}

fn free_buffer(ptr_field: &mut *mut u8, len_field: &mut usize) {
    if (*ptr_field).is_null() {
        return;
    }

    let raw = ptr::slice_from_raw_parts_mut(*ptr_field, *len_field);
    // SAFETY: `raw` was allocated by `Box<[u8]>` via `Box::into_raw`.
    let _ = unsafe { Box::from_raw(raw) };
    *ptr_field = ptr::null_mut();
    *len_field = 0;
}

/// Run a transformation and write its outcome into `result`
///
/// # Safety
///
/// `result` must be NULL or point to a writable `RteResult`.
unsafe fn run_into_result<F>(result: *mut RteResult, operation: F)
where
    F: FnOnce() -> Result<String, ConversionError> + panic::UnwindSafe,
{
    // Validate result pointer first so we can report errors.
    if result.is_null() {
        return;
    }

    // SAFETY: `result` was validated as non-NULL above.
    let result_ref = unsafe { &mut *result };
    reset_result(result_ref);

    // Catch any panics to prevent unwinding into C code.
    match panic::catch_unwind(operation) {
        Ok(Ok(output)) => set_success_result(result_ref, output),
        Ok(Err(e)) => set_error_result(result_ref, e.code(), e.to_string()),
        Err(_) => set_error_result(
            result_ref,
            ERROR_INTERNAL,
            "Internal panic during conversion".to_string(),
        ),
    }
}

// ============================================================================
// FFI Functions
// ============================================================================

/// Sanitize markup against an allow-list of tags
///
/// # Parameters
///
/// - `html`, `html_len`: markup to sanitize (UTF-8)
/// - `tags`, `tags_len`: allowed tags, separated by commas and/or
///   whitespace (UTF-8). An empty list selects the built-in defaults.
/// - `result`: receives the sanitized markup; free with `rte_result_free()`
///
/// # Safety
///
/// - Non-NULL pointers must reference at least `*_len` readable bytes
/// - `result` must be NULL (the call is then a no-op) or writable
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rte_sanitize_html(
    html: *const u8,
    html_len: usize,
    tags: *const u8,
    tags_len: usize,
    result: *mut RteResult,
) {
    // SAFETY: Caller upholds the pointer contract documented above.
    unsafe {
        run_into_result(result, || {
            let markup = required_utf8(html, html_len, "HTML")?;
            let tags = required_utf8(tags, tags_len, "Tags")?;
            let policy = SanitizationPolicy::with_allowed_tags(&parse_tag_list(tags));
            Ok(ContentEngine::new().sanitize_html_with(markup, &policy))
        })
    }
}

/// Convert markup to Markdown
///
/// # Safety
///
/// - `html` must be NULL with `html_len == 0`, or reference `html_len`
///   readable bytes
/// - `result` must be NULL (the call is then a no-op) or writable
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rte_html_to_markdown(
    html: *const u8,
    html_len: usize,
    result: *mut RteResult,
) {
    // SAFETY: Caller upholds the pointer contract documented above.
    unsafe {
        run_into_result(result, || {
            let markup = required_utf8(html, html_len, "HTML")?;
            Ok(ContentEngine::new().html_to_markdown(markup))
        })
    }
}

/// Convert Markdown to markup
///
/// The output is not sanitized; pass it through `rte_sanitize_html()`
/// before inserting it into the editor.
///
/// # Safety
///
/// - `markdown` must be NULL with `markdown_len == 0`, or reference
///   `markdown_len` readable bytes
/// - `result` must be NULL (the call is then a no-op) or writable
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rte_markdown_to_html(
    markdown: *const u8,
    markdown_len: usize,
    result: *mut RteResult,
) {
    // SAFETY: Caller upholds the pointer contract documented above.
    unsafe {
        run_into_result(result, || {
            let markdown = required_utf8(markdown, markdown_len, "Markdown")?;
            Ok(crate::markdown::to_html(markdown))
        })
    }
}

/// Free memory allocated for a result
///
/// Safe to call more than once: after the first call every pointer is
/// NULL and later calls are no-ops. Do NOT call C's `free()` on the
/// result pointers.
///
/// # Safety
///
/// - `result` must be NULL or point to an `RteResult` populated by one of
///   the `rte_*` functions (or reset to all-NULL)
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rte_result_free(result: *mut RteResult) {
    if result.is_null() {
        return;
    }

    // SAFETY: `result` was validated as non-NULL above.
    let result_ref = unsafe { &mut *result };
    free_buffer(&mut result_ref.output, &mut result_ref.output_len);
    free_buffer(&mut result_ref.error_message, &mut result_ref.error_len);
    result_ref.error_code = ERROR_SUCCESS;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag_list() {
        assert_eq!(parse_tag_list("p, a  img,,\tli"), vec!["p", "a", "img", "li"]);
        assert!(parse_tag_list(" , ").is_empty());
    }

    #[test]
    fn test_required_utf8_rejects_null_with_length() {
        let err = required_utf8(ptr::null(), 3, "HTML").unwrap_err();
        assert_eq!(err.code(), ERROR_INVALID_INPUT);
    }

    #[test]
    fn test_required_utf8_allows_empty_null() {
        assert_eq!(required_utf8(ptr::null(), 0, "HTML").unwrap(), "");
    }

    #[test]
    fn test_required_utf8_rejects_invalid_bytes() {
        let bytes = [0x66, 0xff, 0x6f];
        let err = required_utf8(bytes.as_ptr(), bytes.len(), "HTML").unwrap_err();
        assert_eq!(err.code(), ERROR_INVALID_INPUT);
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn test_run_into_result_reports_panic() {
        let mut result = RteResult {
            output: ptr::null_mut(),
            output_len: 0,
            error_code: 0,
            error_message: ptr::null_mut(),
            error_len: 0,
        };

        unsafe {
            run_into_result(&mut result, || -> Result<String, ConversionError> {
                panic!("boom")
            });
        }

        assert_eq!(result.error_code, ERROR_INTERNAL);
        assert!(result.output.is_null());
        assert!(!result.error_message.is_null());

        unsafe { rte_result_free(&mut result) };
        assert!(result.error_message.is_null());
        assert_eq!(result.error_len, 0);
    }

    #[test]
    fn test_parse_error_maps_to_reserved_code() {
        let mut result = RteResult {
            output: ptr::null_mut(),
            output_len: 0,
            error_code: 0,
            error_message: ptr::null_mut(),
            error_len: 0,
        };

        unsafe {
            run_into_result(&mut result, || {
                Err(ConversionError::ParseError("unbalanced".to_string()))
            });
        }

        assert_eq!(result.error_code, ERROR_PARSE);
        assert!(result.output.is_null());

        unsafe { rte_result_free(&mut result) };
    }
}
