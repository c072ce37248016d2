//! Filename cleaning for downloaded web assets.
//!
//! [`Normalizer::normalize`] is a pure string transformation:
//!
//! 1. Artifact markers (`_ssl=1`, `?ssl=1` by default) are removed wherever
//!    they occur.
//! 2. Trailing `.`-tokens that are not supported extensions are stripped
//!    until the name ends in a supported one. The loop is bounded by the
//!    number of segments in the original name.
//! 3. A trailing chain of supported extensions collapses to its last token.
//! 4. If any extension token is `webp`, raster tokens (`jpg`, `jpeg`, `png`,
//!    `gif`) are dropped and `webp` becomes the final extension.
//!
//! ```
//! use assetdedupe::rename::Normalizer;
//!
//! let normalizer = Normalizer::default();
//! assert_eq!(normalizer.normalize("cat_ssl=1.jpg").unwrap(), "cat.jpg");
//! assert_eq!(normalizer.normalize("photo.png.webp").unwrap(), "photo.webp");
//! assert_eq!(normalizer.normalize("img?ssl=1.jpeg").unwrap(), "img.jpeg");
//! ```

use thiserror::Error;

use crate::scanner::AssetRules;

/// Extensions dropped in favour of `webp`.
pub const RASTER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

const WEBP: &str = "webp";

/// Error type for filename normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// No supported extension is left after stripping, or nothing is left before it.
    #[error("cannot normalize '{0}': no supported extension remains")]
    Unnormalizable(String),
}

/// Derives cleaned filenames from the configured markers and extension set.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    rules: AssetRules,
}

impl Normalizer {
    /// Create a normalizer using the given rules.
    #[must_use]
    pub fn new(rules: AssetRules) -> Self {
        Self { rules }
    }

    /// The rules this normalizer applies.
    #[must_use]
    pub fn rules(&self) -> &AssetRules {
        &self.rules
    }

    /// Compute the cleaned form of a file name (no directory component).
    ///
    /// # Errors
    ///
    /// [`NormalizeError::Unnormalizable`] if stripping leaves no supported
    /// extension or an empty stem.
    pub fn normalize(&self, name: &str) -> Result<String, NormalizeError> {
        let unnormalizable = || NormalizeError::Unnormalizable(name.to_string());

        let cleaned = self.strip_markers(name);
        let mut segments = cleaned.split('.');
        let stem = segments.next().unwrap_or_default();
        let mut tokens: Vec<&str> = segments.collect();

        if stem.is_empty() {
            return Err(unnormalizable());
        }

        let bound = name.split('.').count();
        let mut stripped = 0;
        while let Some(last) = tokens.last() {
            if self.rules.is_supported(last) {
                break;
            }
            if stripped >= bound {
                return Err(unnormalizable());
            }
            tokens.pop();
            stripped += 1;
        }
        if tokens.is_empty() {
            return Err(unnormalizable());
        }

        let chain_start = tokens
            .iter()
            .rposition(|t| !self.rules.is_supported(t))
            .map_or(0, |i| i + 1);
        let (body, chain) = tokens.split_at(chain_start);

        let webp = tokens.iter().find(|t| t.eq_ignore_ascii_case(WEBP));
        let (body, extension): (Vec<&str>, &str) = match webp {
            Some(webp) => (
                body.iter()
                    .copied()
                    .filter(|t| !is_raster(t) && !t.eq_ignore_ascii_case(WEBP))
                    .collect(),
                *webp,
            ),
            None => (body.to_vec(), chain[chain.len() - 1]),
        };

        let mut result = String::with_capacity(cleaned.len());
        result.push_str(stem);
        for token in body {
            result.push('.');
            result.push_str(token);
        }
        result.push('.');
        result.push_str(extension);

        Ok(result)
    }

    /// Remove every marker occurrence, repeating until none is left so that
    /// removals cannot splice a new marker together.
    fn strip_markers(&self, name: &str) -> String {
        let mut cleaned = name.to_string();
        while self.rules.contains_marker(&cleaned) {
            for marker in self.rules.markers.iter().filter(|m| !m.is_empty()) {
                cleaned = cleaned.replace(marker.as_str(), "");
            }
        }
        cleaned
    }
}

fn is_raster(token: &str) -> bool {
    RASTER_EXTENSIONS
        .iter()
        .any(|r| r.eq_ignore_ascii_case(token))
}
