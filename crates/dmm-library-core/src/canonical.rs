//! Canonical ID extraction from noisy media filenames.
//!
//! Filenames carry a release code wrapped in format markers and separators
//! (`ABC123_2d.mkv`, `foo_barhhb.mp4`). Extraction turns them into a lowercase
//! identifier that keys the catalog and seeds derived URLs and title lookups.
//!
//! # Strategies
//!
//! Extraction runs an ordered list of strategies, first match wins, and records
//! which one fired as the entry's [`ExtractionMethod`]. Today there is a single
//! catch-all strategy, [`ExtractionMethod::Fallback`], which applies an ordered
//! chain of suffix and separator rules to the extension-stripped name:
//!
//! 1. `…hhb` → drop the `hhb` suffix and stop.
//! 2. contains `_` → keep the text before the first `_`.
//! 3. `…2d` → drop the `2d` suffix.
//!
//! Collisions are expected: different files may share one ID.

use crate::models::ExtractionMethod;

/// Result of canonicalizing one filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical {
    pub id: String,
    pub method: ExtractionMethod,
}

struct Strategy {
    method: ExtractionMethod,
    extract: fn(&str) -> Option<String>,
}

/// Evaluated in order; the last entry must always match.
const STRATEGIES: &[Strategy] = &[Strategy {
    method: ExtractionMethod::Fallback,
    extract: fallback_id,
}];

/// One step of the fallback chain.
struct Rule {
    applies: fn(&str) -> bool,
    apply: fn(&str) -> &str,
    /// Skip the remaining rules once this one has fired.
    stop: bool,
}

const FALLBACK_RULES: &[Rule] = &[
    Rule {
        applies: ends_with_hhb,
        apply: strip_hhb,
        stop: true,
    },
    Rule {
        applies: has_underscore,
        apply: before_underscore,
        stop: false,
    },
    Rule {
        applies: ends_with_2d,
        apply: strip_2d,
        stop: false,
    },
];

fn ends_with_hhb(name: &str) -> bool {
    name.ends_with("hhb")
}

fn strip_hhb(name: &str) -> &str {
    name.strip_suffix("hhb").unwrap_or(name)
}

fn has_underscore(name: &str) -> bool {
    name.contains('_')
}

fn before_underscore(name: &str) -> &str {
    name.split('_').next().unwrap_or(name)
}

fn ends_with_2d(name: &str) -> bool {
    name.ends_with("2d")
}

fn strip_2d(name: &str) -> &str {
    name.strip_suffix("2d").unwrap_or(name)
}

/// Derive the canonical ID for `filename` and the strategy that produced it.
///
/// Total and pure: every input yields an ID, possibly empty.
///
/// ```
/// use dmm_library_core::canonical::canonicalize;
/// use dmm_library_core::models::ExtractionMethod;
///
/// let c = canonicalize("ABC123_2d.mkv");
/// assert_eq!(c.id, "abc123");
/// assert_eq!(c.method, ExtractionMethod::Fallback);
/// ```
pub fn canonicalize(filename: &str) -> Canonical {
    let name = strip_extension(filename).to_lowercase();

    for strategy in STRATEGIES {
        if let Some(id) = (strategy.extract)(&name) {
            return Canonical {
                id,
                method: strategy.method,
            };
        }
    }

    Canonical {
        id: name,
        method: ExtractionMethod::Fallback,
    }
}

/// Shorthand for `canonicalize(filename).id`.
pub fn canonical_id(filename: &str) -> String {
    canonicalize(filename).id
}

fn fallback_id(name: &str) -> Option<String> {
    let mut current = name;
    for rule in FALLBACK_RULES {
        if (rule.applies)(current) {
            current = (rule.apply)(current);
            if rule.stop {
                break;
            }
        }
    }
    Some(current.to_string())
}

/// Remove the final `.ext` from a file name.
///
/// Leading dots do not start an extension, so `.hidden` is returned unchanged.
pub fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) if filename[..idx].chars().any(|c| c != '.') => &filename[..idx],
        _ => filename,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hhb_suffix_short_circuits() {
        assert_eq!(canonical_id("FOO_BARhhb.mp4"), "foo_bar");
        assert_eq!(canonical_id("abc2dhhb.mp4"), "abc2d");
        assert_eq!(canonical_id("SSIS001HHB.mkv"), "ssis001");
    }

    #[test]
    fn test_underscore_split_then_2d_strip() {
        assert_eq!(canonical_id("ABC123_2d.mkv"), "abc123");
        assert_eq!(canonical_id("ABC1232D_extra.mkv"), "abc123");
        assert_eq!(canonical_id("abc123_part_1.mp4"), "abc123");
    }

    #[test]
    fn test_2d_suffix_without_underscore() {
        assert_eq!(canonical_id("abc1232d.mp4"), "abc123");
    }

    #[test]
    fn test_plain_name_is_lowercased_only() {
        assert_eq!(canonical_id("XYZ999.avi"), "xyz999");
        assert_eq!(canonical_id("xyz999"), "xyz999");
    }

    #[test]
    fn test_empty_and_degenerate_names() {
        assert_eq!(canonical_id(""), "");
        assert_eq!(canonical_id(".mp4"), ".mp4");
        assert_eq!(canonical_id("hhb.mp4"), "");
        assert_eq!(canonical_id("_abc.mp4"), "");
    }

    #[test]
    fn test_only_last_extension_is_stripped() {
        assert_eq!(canonical_id("abc123.part1.mp4"), "abc123.part1");
        assert_eq!(strip_extension("a.tar.gz"), "a.tar");
        assert_eq!(strip_extension(".hidden"), ".hidden");
        assert_eq!(strip_extension("noext"), "noext");
    }

    #[test]
    fn test_id_never_contains_uppercase_or_extension() {
        for name in ["MIDE-123.MP4", "Abc_Def.Mkv", "XYZhhb.AVI", "Q2D.wmv"] {
            let id = canonical_id(name);
            assert_eq!(id, id.to_lowercase(), "uppercase in id for {}", name);
            let ext = name.rsplit('.').next().unwrap().to_lowercase();
            assert!(!id.ends_with(&format!(".{}", ext)), "extension kept for {}", name);
        }
    }

    #[test]
    fn test_idempotent_on_canonical_ids() {
        for name in ["ABC123_2d.mkv", "XYZ999.avi", "SSIS001hhb.mp4", "mide00123.mp4"] {
            let id = canonical_id(name);
            assert_eq!(canonical_id(&format!("{}.mp4", id)), id, "not stable for {}", name);
        }
    }

    #[test]
    fn test_method_is_recorded() {
        assert_eq!(
            canonicalize("XYZ999.avi"),
            Canonical {
                id: "xyz999".to_string(),
                method: ExtractionMethod::Fallback,
            }
        );
    }
}
