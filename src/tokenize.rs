//! Word tokens for frequency counting.
//!
//! ASCII punctuation and digits are deleted outright (so `don't` becomes
//! `dont` and `1990s` becomes `s`), the rest is lowercased and split on
//! whitespace. Whole tokens are then dropped by a [`StopwordFilter`].

use std::collections::HashSet;

/// English stoplist (the NLTK `english` corpus).
const ENGLISH: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his",
    "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself",
    "they", "them", "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
    "that", "that'll", "these", "those", "am", "is", "are", "was", "were", "be", "been",
    "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an", "the",
    "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
    "with", "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
    "any", "both", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not",
    "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will", "just", "don",
    "don't", "should", "should've", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain",
    "aren", "aren't", "couldn", "couldn't", "didn", "didn't", "doesn", "doesn't", "hadn",
    "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't", "ma", "mightn",
    "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't", "shouldn",
    "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
];

/// Decides whether a lowercase token is too common to count.
pub trait StopwordFilter {
    fn is_stopword(&self, token: &str) -> bool;
}

impl<F> StopwordFilter for F
where
    F: Fn(&str) -> bool,
{
    fn is_stopword(&self, token: &str) -> bool {
        self(token)
    }
}

/// Set-backed stoplist.
#[derive(Debug, Clone, Default)]
pub struct Stoplist {
    words: HashSet<String>,
}

impl Stoplist {
    /// The built-in English list.
    #[must_use]
    pub fn english() -> Self {
        Self {
            words: ENGLISH.iter().map(|w| (*w).to_string()).collect(),
        }
    }

    /// Add words (lowercased) on top of what is already there.
    #[must_use]
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words
            .extend(extra.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl StopwordFilter for Stoplist {
    fn is_stopword(&self, token: &str) -> bool {
        self.words.contains(token)
    }
}

/// Characters deleted before splitting.
fn is_excluded(c: char) -> bool {
    c.is_ascii_punctuation() || c.is_ascii_digit()
}

/// Lazy token stream over `text`.
pub fn tokens<'a, F>(text: &'a str, filter: &'a F) -> impl Iterator<Item = String> + 'a
where
    F: StopwordFilter + ?Sized,
{
    text.split_whitespace()
        .map(|raw| {
            raw.chars()
                .filter(|&c| !is_excluded(c))
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(move |t| !t.is_empty() && !filter.is_stopword(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str) -> Vec<String> {
        tokens(text, &Stoplist::english()).collect()
    }

    #[test]
    fn stopwords_and_case() {
        assert_eq!(
            collect("The cat sat on the MAT"),
            vec!["cat", "sat", "mat"]
        );
    }

    #[test]
    fn punctuation_and_digits_deleted() {
        assert_eq!(
            collect("Rome, (founded 753 BC) grew!"),
            vec!["rome", "founded", "bc", "grew"]
        );
        // apostrophe removed first, so the contraction no longer matches
        assert_eq!(collect("don't"), vec!["dont"]);
    }

    #[test]
    fn pure_punctuation_yields_nothing() {
        assert!(collect("-- ... 1999 !!").is_empty());
    }

    #[test]
    fn closure_filter() {
        let only_long = |t: &str| t.len() < 4;
        let got: Vec<String> = tokens("a big elephant walked", &only_long).collect();
        assert_eq!(got, vec!["elephant", "walked"]);
    }

    #[test]
    fn extra_stopwords_lowercased() {
        let list = Stoplist::english().with_extra(["Cat"]);
        let got: Vec<String> = tokens("cat dog", &list).collect();
        assert_eq!(got, vec!["dog"]);
        assert!(list.is_stopword("cat"));
        assert_eq!(list.len(), Stoplist::english().len() + 1);
        assert!(!list.is_empty());
    }

    #[test]
    fn non_ascii_letters_kept() {
        assert_eq!(collect("Café Über"), vec!["café", "über"]);
    }
}
