use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Global string interner for element and plan IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for spatial elements.
/// A 4-byte `Spur` index; comparisons and hashing never touch the string.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(Spur);

impl ElementId {
    /// Intern a string as an ElementId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        ElementId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a time-based id: `element-{unix_millis}`.
    ///
    /// Two calls inside the same millisecond get a `-{n}` suffix so ids
    /// stay unique for the lifetime of the process.
    pub fn generate() -> Self {
        Self::generate_at(chrono::Utc::now().timestamp_millis())
    }

    /// Same as [`ElementId::generate`] with an explicit clock reading.
    pub fn generate_at(millis: i64) -> Self {
        static LAST_MILLIS: AtomicI64 = AtomicI64::new(i64::MIN);
        static SAME_TICK: AtomicU64 = AtomicU64::new(0);

        let previous = LAST_MILLIS.swap(millis, Ordering::Relaxed);
        let n = if previous == millis {
            SAME_TICK.fetch_add(1, Ordering::Relaxed) + 1
        } else {
            SAME_TICK.store(0, Ordering::Relaxed);
            0
        };

        let mut candidate = if n == 0 {
            format!("element-{millis}")
        } else {
            format!("element-{millis}-{n}")
        };
        // Imported documents may already hold an id from this millisecond.
        let mut bump = n;
        while INTERNER.get(&candidate).is_some() {
            bump += 1;
            candidate = format!("element-{millis}-{bump}");
        }
        Self::intern(&candidate)
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ElementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ElementId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ElementId::intern(&s))
    }
}
