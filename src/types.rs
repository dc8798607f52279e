use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Range is used to express the extent of a match, as positions into the
/// input.
pub type Range = core::ops::Range<usize>;

/// The maximum number of distinct captures a single engine supports.
pub const MAX_CAPTURE_SLOTS: usize = 65535;

/// A slot index into a per-attempt capture table.
pub type SlotIndex = usize;

/// Identifies a capture. Ids are unique within the process, so a handle can
/// never be confused with a capture created for another pattern.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaptureId(u32);

impl CaptureId {
    fn fresh() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        CaptureId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A handle to a capture, returned alongside the capturing pattern.
///
/// The handle does not hold a matched value itself: each match attempt owns
/// its own slot table, and the handle is the key into it.
#[derive(Debug, Clone)]
pub struct CaptureHandle {
    id: CaptureId,
    name: Arc<str>,
}

impl CaptureHandle {
    pub(crate) fn new(name: Option<&str>) -> Self {
        let id = CaptureId::fresh();
        let name: Arc<str> = match name {
            Some(name) => name.into(),
            None => format!("capture{}", id.0).into(),
        };
        Self { id, name }
    }

    /// The unique id of this capture.
    #[inline]
    pub fn id(&self) -> CaptureId {
        self.id
    }

    /// The diagnostic name of this capture.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for CaptureHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CaptureHandle {}

impl fmt::Display for CaptureHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}
