#![no_main]

use libfuzzer_sys::fuzz_target;
use rte_content::ffi::{
    ERROR_INVALID_INPUT, ERROR_SUCCESS, RteResult, rte_html_to_markdown, rte_markdown_to_html,
    rte_result_free, rte_sanitize_html,
};
use std::ptr;

// First byte selects the entry point; the rest is passed through unchecked
fuzz_target!(|data: &[u8]| {
    let Some((&selector, input)) = data.split_first() else {
        return;
    };

    let mut result = RteResult {
        output: ptr::null_mut(),
        output_len: 0,
        error_code: 0,
        error_message: ptr::null_mut(),
        error_len: 0,
    };

    unsafe {
        match selector % 3 {
            0 => rte_sanitize_html(input.as_ptr(), input.len(), b"p,a".as_ptr(), 3, &mut result),
            1 => rte_html_to_markdown(input.as_ptr(), input.len(), &mut result),
            _ => rte_markdown_to_html(input.as_ptr(), input.len(), &mut result),
        }
    }

    let expected = if std::str::from_utf8(input).is_ok() {
        ERROR_SUCCESS
    } else {
        ERROR_INVALID_INPUT
    };
    assert_eq!(result.error_code, expected);

    unsafe { rte_result_free(&mut result) };
    assert!(result.output.is_null());
    assert!(result.error_message.is_null());
});
