//! Borrowed field views passed across the engine boundary.
//!
//! A result's fields arrive as `FfiField<'a>` values that point into memory
//! owned by the caller. They are only valid for the duration of the call that
//! receives them, which the `'a` lifetime enforces on the Rust side. The engine
//! copies whatever it keeps into [`Field`] before returning.

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

/// Borrowed text view: a pointer and a length, never owned.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct FfiString<'a> {
    start: *const u8,
    len: usize,
    _marker: PhantomData<&'a [u8]>,
}

impl<'a> FfiString<'a> {
    pub fn new(s: &'a str) -> Self {
        Self {
            start: s.as_ptr(),
            len: s.len(),
            _marker: PhantomData,
        }
    }

    pub fn empty() -> Self {
        Self {
            start: std::ptr::null(),
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Build a view from raw parts handed over by a foreign caller.
    ///
    /// # Safety
    ///
    /// `start` must be null with `len == 0`, or point to `len` readable bytes
    /// that stay valid and unmodified for `'a`.
    pub unsafe fn from_raw_parts(start: *const u8, len: usize) -> Self {
        Self {
            start,
            len,
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        if self.start.is_null() || self.len == 0 {
            return &[];
        }
        // SAFETY: both constructors guarantee `len` readable bytes for `'a`.
        unsafe { std::slice::from_raw_parts(self.start, self.len) }
    }

    pub fn to_string_lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.as_bytes())
    }
}

impl<'a> From<&'a str> for FfiString<'a> {
    fn from(s: &'a str) -> Self {
        FfiString::new(s)
    }
}

/// Tag of an [`FfiField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum FieldTag {
    Num = 0,
    String = 1,
    /// The sender had a field type this boundary does not carry.
    Unknown = 2,
}

/// Tagged field value: `num` is meaningful for `Num`, `string` for `String`.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct FfiField<'a> {
    pub tag: FieldTag,
    pub num: i64,
    pub string: FfiString<'a>,
}

impl<'a> FfiField<'a> {
    pub fn num(value: i64) -> Self {
        Self {
            tag: FieldTag::Num,
            num: value,
            string: FfiString::empty(),
        }
    }

    pub fn string(value: &'a str) -> Self {
        Self {
            tag: FieldTag::String,
            num: 0,
            string: FfiString::new(value),
        }
    }

    pub fn unknown() -> Self {
        Self {
            tag: FieldTag::Unknown,
            num: 0,
            string: FfiString::empty(),
        }
    }
}

/// Field copied out of a borrowed view; owned by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    Num(i64),
    String(String),
}

impl Field {
    /// Copy a view, or `None` when its tag is `Unknown`.
    pub fn from_ffi(field: &FfiField<'_>) -> Option<Field> {
        match field.tag {
            FieldTag::Num => Some(Field::Num(field.num)),
            FieldTag::String => Some(Field::String(field.string.to_string_lossy().into_owned())),
            FieldTag::Unknown => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Num(n) => write!(f, "{n}"),
            Field::String(s) => f.write_str(s),
        }
    }
}

/// Copy borrowed views into owned fields, dropping `Unknown` tags.
pub fn unmarshal_fields(fields: &[FfiField<'_>]) -> Vec<Field> {
    let out: Vec<Field> = fields.iter().filter_map(Field::from_ffi).collect();
    if out.len() != fields.len() {
        tracing::trace!(
            dropped = fields.len() - out.len(),
            "dropped fields with unknown tags"
        );
    }
    out
}
