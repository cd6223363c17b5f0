// Tweet-text normalization.
//
// The vectorizer's vocabulary is frozen after fitting on the exemplar
// corpus, so preprocessing must be bit-exact across exemplar, sample, and
// brand corpora. Rule order matters: mentions and URLs are stripped
// before hashtags are expanded, and `RT` is matched case-sensitively
// before the final lowercasing.

use std::sync::LazyLock;

use regex_lite::Regex;

static MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\S+").unwrap());
static URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"http\S+").unwrap());
static HASHTAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#(\S+)").unwrap());
static RETWEET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bRT\b").unwrap());
static ENTITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&[a-z]+;").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalize one account's concatenated tweet text.
///
/// - `@mentions` and `http(s)` URLs are removed entirely.
/// - `#word` becomes `hashtagword hashtagword` — duplicated so the tag
///   survives bigram tokenization as both halves of a bigram.
/// - The retweet marker `RT` and HTML entities (`&lt;` etc.) are removed.
/// - Whitespace is collapsed, the result trimmed and lowercased.
pub fn preprocess(s: &str) -> String {
    let s = MENTION.replace_all(s, " ");
    let s = URL.replace_all(&s, " ");
    let s = HASHTAG.replace_all(&s, "hashtag$1 hashtag$1");
    let s = RETWEET.replace_all(&s, " ");
    let s = ENTITY.replace_all(&s, " ");
    let s = WHITESPACE.replace_all(&s, " ");
    s.trim().to_lowercase()
}
