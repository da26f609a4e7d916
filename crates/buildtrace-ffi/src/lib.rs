//! buildtrace FFI Bindings - C surface of the telemetry engine
//!
//! Hosts that are not written in Rust drive the engine through these
//! functions. The handle returned by [`initialize_plugin`] is opaque to them;
//! every other call takes it back.
//!
//! ```text
//! host (C/C++)
//!     |
//!     +-- initialize_plugin / deinitialize_plugin
//!     +-- start_activity / end_activity / on_result
//!     |
//!     v
//! buildtrace-engine (Context)
//! ```
//!
//! Kinds cross the boundary as raw `u32` values; anything the engine does not
//! know becomes `Unknown`. Null handles are ignored.

use buildtrace_engine::{
    ActivityId, ActivityKind, Context, FfiField, FfiString, FieldTag, ResultKind,
};
use std::ffi::{CStr, c_char};
use std::marker::PhantomData;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{error, warn};

/// A field as laid out by a foreign caller. The tag is a plain integer so
/// that values this side does not know cannot produce an invalid enum.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct RawField<'a> {
    pub tag: u32,
    pub num: i64,
    pub string: FfiString<'a>,
}

impl<'a> RawField<'a> {
    fn to_field(self) -> FfiField<'a> {
        match self.tag {
            t if t == FieldTag::Num as u32 => FfiField {
                tag: FieldTag::Num,
                num: self.num,
                string: FfiString::empty(),
            },
            t if t == FieldTag::String as u32 => FfiField {
                tag: FieldTag::String,
                num: 0,
                string: self.string,
            },
            _ => FfiField::unknown(),
        }
    }
}

/// Borrowed array of fields: `count` entries starting at `start`.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct FfiFields<'a> {
    pub start: *const RawField<'a>,
    pub count: usize,
    _marker: PhantomData<&'a [RawField<'a>]>,
}

impl<'a> FfiFields<'a> {
    pub fn new(fields: &'a [RawField<'a>]) -> Self {
        Self {
            start: fields.as_ptr(),
            count: fields.len(),
            _marker: PhantomData,
        }
    }

    /// # Safety
    ///
    /// `start` must be null with `count == 0`, or point to `count` valid
    /// `RawField`s that outlive `'a`.
    unsafe fn as_slice(&self) -> &'a [RawField<'a>] {
        if self.start.is_null() || self.count == 0 {
            return &[];
        }
        // SAFETY: guaranteed by the caller.
        unsafe { std::slice::from_raw_parts(self.start, self.count) }
    }
}

/// Run a boundary call; panics must not unwind into the host.
fn guarded(op: &'static str, f: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(f)).is_err() {
        error!(op, "panic inside the telemetry engine");
    }
}

/// # Safety
///
/// `ptr` must be null or point to a valid `FfiString`.
unsafe fn setting(ptr: *const FfiString<'_>) -> Option<String> {
    // SAFETY: guaranteed by the caller.
    let view = unsafe { ptr.as_ref() }?;
    Some(view.to_string_lossy().into_owned())
}

/// Start the engine and return its handle.
///
/// A null or empty endpoint creates a disabled engine. If the engine fails to
/// start, a disabled engine is returned as well, so the result is never null.
///
/// # Safety
///
/// `endpoint` and `headers` must each be null or point to a valid `FfiString`
/// for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn initialize_plugin(
    endpoint: *const FfiString<'_>,
    headers: *const FfiString<'_>,
) -> *mut Context {
    // SAFETY: forwarded from the caller.
    let (endpoint, headers) = unsafe { (setting(endpoint), setting(headers)) };

    let context = catch_unwind(|| Context::initialize_from(endpoint.as_deref(), headers.as_deref()));
    let context = match context {
        Ok(Ok(context)) => context,
        Ok(Err(e)) => {
            warn!("telemetry engine failed to start: {e}; telemetry disabled");
            Context::disabled()
        }
        Err(_) => {
            error!("panic while starting the telemetry engine; telemetry disabled");
            Context::disabled()
        }
    };
    Box::into_raw(Box::new(context))
}

/// Shut the engine down and free its handle.
///
/// # Safety
///
/// `context` must be null or a handle returned by [`initialize_plugin`] that
/// has not been freed yet. It must not be used afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn deinitialize_plugin(context: *mut Context) {
    if context.is_null() {
        return;
    }
    // SAFETY: the handle came from `Box::into_raw` in `initialize_plugin`.
    let context = unsafe { Box::from_raw(context) };
    guarded("deinitialize", || context.deinitialize());
}

/// # Safety
///
/// `context` must be null or a live handle. `name` must be null or a
/// NUL-terminated string valid for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn start_activity(
    context: *const Context,
    id: ActivityId,
    kind: u32,
    name: *const c_char,
    parent: ActivityId,
) {
    // SAFETY: guaranteed by the caller.
    let Some(context) = (unsafe { context.as_ref() }) else {
        return;
    };
    let name = if name.is_null() {
        String::new()
    } else {
        // SAFETY: guaranteed by the caller.
        unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned()
    };
    guarded("start_activity", || {
        context.start_span(id, ActivityKind::from_raw(kind), &name, parent)
    });
}

/// # Safety
///
/// `context` must be null or a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn end_activity(context: *const Context, id: ActivityId) {
    // SAFETY: guaranteed by the caller.
    let Some(context) = (unsafe { context.as_ref() }) else {
        return;
    };
    guarded("end_activity", || context.end_span(id));
}

/// # Safety
///
/// `context` must be null or a live handle. `fields` must describe `count`
/// valid `RawField`s whose strings stay valid for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn on_result(
    context: *const Context,
    id: ActivityId,
    kind: u32,
    fields: FfiFields<'_>,
) {
    // SAFETY: guaranteed by the caller.
    let Some(context) = (unsafe { context.as_ref() }) else {
        return;
    };
    // SAFETY: guaranteed by the caller.
    let raw = unsafe { fields.as_slice() };
    let fields: Vec<FfiField<'_>> = raw.iter().map(|f| f.to_field()).collect();
    guarded("on_result", || {
        context.record_result(id, ResultKind::from_raw(kind), &fields)
    });
}
