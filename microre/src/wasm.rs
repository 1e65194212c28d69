//! WebAssembly bindings for JavaScript
//!
//! Lets a browser-hosted simulator of the device run the same engine the
//! firmware uses. Enable with the "wasm" feature flag.

use wasm_bindgen::prelude::*;

use crate::regexp::{self, ExecResult, RegExp};
use crate::replace::{ReplaceArgs, Replacer};

fn to_js_error(e: crate::error::RegexError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// JavaScript-facing pattern object
#[wasm_bindgen]
pub struct JsRegExp {
    regexp: RegExp,
}

#[wasm_bindgen]
impl JsRegExp {
    /// Create a pattern object
    ///
    /// Returns an error string if the flags are invalid
    #[wasm_bindgen(constructor)]
    pub fn new(pattern: &str, flags: Option<String>) -> Result<JsRegExp, JsValue> {
        RegExp::new(pattern, flags.as_deref().unwrap_or(""))
            .map(|regexp| JsRegExp { regexp })
            .map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn source(&self) -> String {
        self.regexp.source().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn flags(&self) -> String {
        self.regexp.flags().to_string()
    }

    #[wasm_bindgen(getter, js_name = lastIndex)]
    pub fn last_index(&self) -> usize {
        self.regexp.last_index()
    }

    #[wasm_bindgen(setter, js_name = lastIndex)]
    pub fn set_last_index(&mut self, last_index: usize) {
        self.regexp.set_last_index(last_index);
    }

    #[wasm_bindgen(js_name = exec)]
    pub fn exec(&mut self, input: &str) -> Result<Option<JsExecResult>, JsValue> {
        self.regexp
            .exec(input)
            .map(|found| found.map(|result| JsExecResult { result }))
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = test)]
    pub fn test(&mut self, input: &str) -> Result<bool, JsValue> {
        self.regexp.test(input).map_err(to_js_error)
    }

    /// Replace using a template string or a function
    #[wasm_bindgen(js_name = replace)]
    pub fn replace(&mut self, input: &str, replacement: &JsValue) -> Result<String, JsValue> {
        self.replace_with(input, replacement, false)
    }

    /// Replace every match, whatever the flags
    #[wasm_bindgen(js_name = replaceAll)]
    pub fn replace_all(&mut self, input: &str, replacement: &JsValue) -> Result<String, JsValue> {
        self.replace_with(input, replacement, true)
    }

    #[wasm_bindgen(js_name = toString)]
    pub fn to_js_string(&self) -> String {
        self.regexp.to_string()
    }

    #[wasm_bindgen(js_name = split)]
    pub fn split(&self, input: &str) -> Result<js_sys::Array, JsValue> {
        let parts = regexp::split(input, &self.regexp).map_err(to_js_error)?;
        Ok(parts.iter().map(|part| JsValue::from_str(part)).collect())
    }
}

impl JsRegExp {
    fn replace_with(
        &mut self,
        input: &str,
        replacement: &JsValue,
        all: bool,
    ) -> Result<String, JsValue> {
        let Some(callback) = replacement.dyn_ref::<js_sys::Function>() else {
            let template = replacement.as_string().unwrap_or_default();
            return run_replace(input, &mut self.regexp, template.as_str(), all)
                .map_err(to_js_error);
        };

        let mut failure = None;
        let replacer = |args: &ReplaceArgs<'_>| {
            let call_args = js_sys::Array::new();
            call_args.push(&JsValue::from_str(args.matched));
            for capture in args.captures {
                match capture {
                    Some(text) => call_args.push(&JsValue::from_str(text)),
                    None => call_args.push(&JsValue::UNDEFINED),
                };
            }
            call_args.push(&JsValue::from_f64(args.index as f64));
            call_args.push(&JsValue::from_str(args.input));
            match callback.apply(&JsValue::NULL, &call_args) {
                Ok(value) => value.as_string().unwrap_or_default(),
                Err(e) => {
                    failure.get_or_insert(e);
                    String::new()
                }
            }
        };
        let replaced = run_replace(input, &mut self.regexp, replacer, all).map_err(to_js_error)?;
        match failure {
            Some(e) => Err(e),
            None => Ok(replaced),
        }
    }
}

fn run_replace<R: Replacer>(
    input: &str,
    regexp: &mut RegExp,
    replacer: R,
    all: bool,
) -> crate::error::Result<String> {
    if all {
        regexp::replace_all(input, regexp, replacer)
    } else {
        regexp::replace(input, regexp, replacer)
    }
}

/// JavaScript-facing exec result
#[wasm_bindgen]
pub struct JsExecResult {
    result: ExecResult,
}

#[wasm_bindgen]
impl JsExecResult {
    #[wasm_bindgen(getter)]
    pub fn index(&self) -> usize {
        self.result.index
    }

    /// Get matched text
    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String {
        self.result.matched.clone()
    }

    /// Get capture group by index; 0 is the whole match
    #[wasm_bindgen(js_name = group)]
    pub fn group(&self, index: usize) -> Option<String> {
        self.result.get(index).map(str::to_string)
    }

    /// Get all groups as a JavaScript array, `undefined` for absent groups
    #[wasm_bindgen(getter)]
    pub fn groups(&self) -> js_sys::Array {
        self.result
            .captures
            .iter()
            .map(|capture| match capture {
                Some(text) => JsValue::from_str(text),
                None => JsValue::UNDEFINED,
            })
            .collect()
    }
}

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_all_ignores_global_flag() {
        let mut re = RegExp::new("a", "").unwrap();
        assert_eq!(run_replace("abab", &mut re, "X", false).unwrap(), "Xbab");
        assert_eq!(run_replace("abab", &mut re, "X", true).unwrap(), "XbXb");
        assert_eq!(re.last_index(), 0);
    }
}
