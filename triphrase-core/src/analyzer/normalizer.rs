use std::borrow::Cow;

use triphrase_types::WordPolicy;

/// Builds the ASCII class table for a word policy.
///
/// Entry `b` holds the lowercased byte for a word byte and `0` for a separator.
const fn ascii_table(policy: WordPolicy) -> [u8; 128] {
    let mut table = [0u8; 128];
    let mut b = 0usize;
    while b < 128 {
        let byte = b as u8;
        if policy.is_word_byte(byte) {
            table[b] = byte.to_ascii_lowercase();
        }
        b += 1;
    }
    table
}

const ALNUM_TABLE: [u8; 128] = ascii_table(WordPolicy::Alnum);
const RICH_TABLE: [u8; 128] = ascii_table(WordPolicy::AlnumApostropheHyphen);

/// Configuration options for text normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizerConfig {
    /// Which characters survive normalization as word characters.
    pub word_policy: WordPolicy,
}

/// Single-pass text normalizer.
///
/// Performs the following operations:
/// - Converts all word characters to lowercase (Unicode-aware)
/// - Replaces every maximal run of non-word characters with one space
///
/// Leading and trailing separator runs also become a single space; the
/// tokenizer drops the empty edges. The output never contains two
/// consecutive spaces, and normalizing it again is a no-op.
///
/// # Performance
///
/// ASCII bytes go through a 128-entry class table (lowercase byte or
/// separator). Non-ASCII characters are decoded and classified one at a time.
///
/// # Examples
///
/// ```
/// use triphrase_core::analyzer::normalizer::TextNormalizer;
///
/// let normalizer = TextNormalizer::default();
/// assert_eq!(normalizer.normalize("The cat, the HAT."), "the cat the hat ");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer {
    config: NormalizerConfig,
}

impl TextNormalizer {
    /// Creates a new normalizer with the specified configuration.
    pub const fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Creates a normalizer for a word policy.
    pub const fn with_policy(word_policy: WordPolicy) -> Self {
        Self::new(NormalizerConfig { word_policy })
    }

    /// Returns the word policy in use.
    #[inline(always)]
    pub const fn word_policy(&self) -> WordPolicy {
        self.config.word_policy
    }

    /// Normalizes text into an existing String buffer.
    ///
    /// Reuses the buffer's capacity if sufficient, growing only when necessary.
    /// Clears the buffer before writing.
    pub fn normalize_into(&self, input: &str, out: &mut String) {
        out.clear();
        out.reserve(input.len());

        let policy = self.config.word_policy;
        let table = match policy {
            WordPolicy::Alnum => &ALNUM_TABLE,
            WordPolicy::AlnumApostropheHyphen => &RICH_TABLE,
        };

        let bytes = input.as_bytes();
        let mut i = 0usize;
        let mut prev_space = false;

        while i < bytes.len() {
            let b = bytes[i];

            if b < 0x80 {
                let mapped = table[b as usize];
                if mapped != 0 {
                    out.push(mapped as char);
                    prev_space = false;
                } else if !prev_space {
                    out.push(' ');
                    prev_space = true;
                }
                i += 1;
                continue;
            }

            // `i` only ever advances by whole characters, so it sits on a
            // char boundary here.
            let Some(ch) = input[i..].chars().next() else {
                break;
            };
            i += ch.len_utf8();

            if policy.is_word_char(ch) {
                for lowered in ch.to_lowercase() {
                    // Expansions such as 'İ' -> "i\u{307}" keep only word chars.
                    if policy.is_word_char(lowered) {
                        out.push(lowered);
                        prev_space = false;
                    }
                }
            } else if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        }
    }

    /// Normalizes text and returns a new String.
    #[inline]
    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.normalize_into(input, &mut out);
        out
    }

    /// Normalizes raw document bytes.
    ///
    /// Invalid UTF-8 sequences decode to U+FFFD, which is a separator under
    /// every policy.
    pub fn normalize_bytes_into(&self, input: &[u8], out: &mut String) {
        let text: Cow<'_, str> = String::from_utf8_lossy(input);
        self.normalize_into(&text, out);
    }
}
