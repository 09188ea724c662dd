//! Fallback AFK reasons.
//!
//! Loaded once at startup from a plain text file, one reason per line.

use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use tracing::info;

/// Non-empty list of reasons used when `/afk` is sent without one.
#[derive(Debug, Clone)]
pub struct FallbackReasons {
    reasons: Arc<[String]>,
}

impl FallbackReasons {
    /// Build from an in-memory list. Blank entries are dropped.
    ///
    /// # Errors
    /// Returns error if no non-blank reason remains.
    pub fn new<I, S>(reasons: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let reasons: Vec<String> = reasons
            .into_iter()
            .map(|r| r.as_ref().trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();

        if reasons.is_empty() {
            bail!("fallback reason list is empty");
        }

        Ok(Self {
            reasons: reasons.into(),
        })
    }

    /// Load reasons from a file, one per line.
    ///
    /// # Errors
    /// Returns error if the file can't be read or holds no reasons.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read AFK reasons from {}", path.display()))?;

        let reasons = Self::new(content.lines())
            .with_context(|| format!("no AFK reasons in {}", path.display()))?;

        info!("Loaded {} fallback AFK reasons", reasons.len());
        Ok(reasons)
    }

    /// Number of reasons.
    pub fn len(&self) -> usize {
        self.reasons.len()
    }

    /// All reasons in file order.
    #[cfg(test)]
    pub fn as_slice(&self) -> &[String] {
        &self.reasons
    }

    /// Pick one reason at random.
    pub fn pick(&self) -> &str {
        if self.reasons.len() == 1 {
            return &self.reasons[0];
        }

        // Sub-second clock noise is plenty for picking a joke
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0) as usize;
        &self.reasons[nanos % self.reasons.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_dropped() {
        let reasons = FallbackReasons::new(["  fishing ", "", "   ", "napping"]).unwrap();
        assert_eq!(reasons.as_slice(), ["fishing", "napping"]);
    }

    #[test]
    fn test_empty_list_rejected() {
        assert!(FallbackReasons::new(Vec::<String>::new()).is_err());
        assert!(FallbackReasons::new(["", "  "]).is_err());
    }

    #[test]
    fn test_pick_from_list() {
        let reasons = FallbackReasons::new(["a", "b", "c"]).unwrap();
        for _ in 0..50 {
            assert!(["a", "b", "c"].contains(&reasons.pick()));
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reasons.txt");
        std::fs::write(&path, "walking the cat\n\nfeeding the dog\n").unwrap();

        let reasons = FallbackReasons::load(&path).unwrap();
        assert_eq!(reasons.len(), 2);
        assert_eq!(reasons.as_slice()[0], "walking the cat");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FallbackReasons::load(dir.path().join("nope.txt")).is_err());
    }
}
