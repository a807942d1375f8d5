//! TF-IDF keyword extraction per product and sentiment bucket
//!
//! Third pipeline stage: computes discriminative terms for each product from
//! the sentiment-labeled corpus. Each product gets four corpora (overall plus
//! one per sentiment label); within a corpus each review is one document.
//! Terms are unigrams and bigrams, weighted with smoothed TF-IDF over
//! L2-normalized document vectors, filtered by document frequency, standard
//! and extra stopwords, and the product's own brand vocabulary.
//!
//! All orderings are explicit: vocabulary lives in sorted maps and ranking
//! ties break on lexical term order, so output is byte-stable across runs.

use std::collections::{BTreeMap, HashSet};
use stop_words::{get, LANGUAGE};
use tracing::{debug, info};

use crate::models::{Bucket, KeywordEntry, Product, Review};

/// Characters trimmed from brand/product-name tokens before matching.
const BRAND_TOKEN_TRIM: &[char] = &[',', '.', '\'', '"'];

/// Immutable keyword-extraction settings, built once per run and safe to
/// share across products.
#[derive(Debug, Clone)]
pub struct KeywordConfig {
    /// Minimum number of documents a term must appear in
    pub min_df: usize,
    /// Terms retained per (product, bucket)
    pub top_k: usize,
    stopwords: HashSet<String>,
}

impl KeywordConfig {
    /// Build the config from standard English stopwords plus an extra
    /// caller-supplied list (domain noise terms).
    #[must_use]
    pub fn new(min_df: usize, top_k: usize, extra_stopwords: &[String]) -> Self {
        let mut stopwords: HashSet<String> = get(LANGUAGE::English)
            .iter()
            .map(|w| w.to_lowercase())
            .collect();
        stopwords.extend(extra_stopwords.iter().map(|w| w.to_lowercase()));
        Self {
            min_df,
            top_k,
            stopwords,
        }
    }
}

/// Extracts ranked keyword entries from sentiment-labeled reviews.
pub struct KeywordExtractor {
    config: KeywordConfig,
}

impl KeywordExtractor {
    /// Create an extractor over the given immutable config.
    #[must_use]
    pub const fn new(config: KeywordConfig) -> Self {
        Self { config }
    }

    /// Extract keywords for every product in the reference table.
    ///
    /// Products are processed in sorted id order. A bucket with zero reviews
    /// yields zero entries; that is not an error.
    #[must_use]
    pub fn extract(&self, reviews: &[Review], products: &[Product]) -> Vec<KeywordEntry> {
        let mut by_product: BTreeMap<&str, Vec<&Review>> = BTreeMap::new();
        for review in reviews {
            by_product.entry(&review.product_id).or_default().push(review);
        }

        let mut sorted_products: Vec<&Product> = products.iter().collect();
        sorted_products.sort_by(|a, b| a.product_id.cmp(&b.product_id));

        let mut entries = Vec::new();
        for product in sorted_products {
            let product_reviews = by_product
                .get(product.product_id.as_str())
                .map_or(&[][..], Vec::as_slice);
            let brand = brand_tokens(product);

            for bucket in Bucket::ALL {
                let texts: Vec<&str> = product_reviews
                    .iter()
                    .filter(|r| match bucket {
                        Bucket::Overall => true,
                        other => r.sentiment_label.map(Bucket::from_label) == Some(other),
                    })
                    .map(|r| r.text.as_str())
                    .collect();

                let ranked = self.extract_bucket(&texts, &brand);
                debug!(
                    product_id = %product.product_id,
                    bucket = bucket.as_str(),
                    documents = texts.len(),
                    terms = ranked.len(),
                    "extracted bucket keywords"
                );
                for (rank, (term, score)) in ranked.into_iter().enumerate() {
                    entries.push(KeywordEntry {
                        product_id: product.product_id.clone(),
                        bucket,
                        term,
                        score,
                        rank: rank + 1,
                    });
                }
            }
        }

        info!(entries = entries.len(), "keyword extraction complete");
        entries
    }

    /// Score one bucket corpus and return the top-k (term, score) pairs,
    /// ties broken by lexical term order.
    fn extract_bucket(&self, texts: &[&str], brand: &HashSet<String>) -> Vec<(String, f64)> {
        if texts.is_empty() {
            return Vec::new();
        }

        let documents: Vec<Vec<String>> = texts.iter().map(|t| self.terms(t, brand)).collect();
        let n_docs = documents.len();

        // Document frequency per term; sorted map keeps everything downstream
        // deterministic.
        let mut df: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in &documents {
            let unique: HashSet<&str> = doc.iter().map(String::as_str).collect();
            for term in unique {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let idf: BTreeMap<&str, f64> = df
            .iter()
            .filter(|&(_, &count)| count >= self.config.min_df)
            .map(|(&term, &count)| {
                let idf = ((1.0 + n_docs as f64) / (1.0 + count as f64)).ln() + 1.0;
                (term, idf)
            })
            .collect();

        if idf.is_empty() {
            return Vec::new();
        }

        // Sum each document's L2-normalized tf-idf vector into per-term scores.
        let mut scores: BTreeMap<&str, f64> = BTreeMap::new();
        for doc in &documents {
            let mut tf: BTreeMap<&str, usize> = BTreeMap::new();
            for term in doc {
                if idf.contains_key(term.as_str()) {
                    *tf.entry(term).or_insert(0) += 1;
                }
            }
            let weights: Vec<(&str, f64)> = tf
                .iter()
                .map(|(&term, &count)| (term, count as f64 * idf[term]))
                .collect();
            let norm: f64 = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            if norm == 0.0 {
                continue;
            }
            for (term, weight) in weights {
                *scores.entry(term).or_insert(0.0) += weight / norm;
            }
        }

        let mut ranked: Vec<(String, f64)> = scores
            .into_iter()
            .map(|(term, score)| (term.to_string(), score))
            .collect();
        // Descending score, lexical tie-break; scores here are finite.
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.config.top_k);
        ranked
    }

    /// Tokenize a normalized text into word tokens, dropping stopwords and
    /// the product's brand vocabulary, then emit unigrams plus adjacent
    /// bigrams over the remaining sequence.
    fn terms(&self, text: &str, brand: &HashSet<String>) -> Vec<String> {
        let tokens: Vec<&str> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| {
                t.len() >= 2 && !self.config.stopwords.contains(*t) && !brand.contains(*t)
            })
            .collect();

        let mut terms: Vec<String> = tokens.iter().map(|t| (*t).to_string()).collect();
        for pair in tokens.windows(2) {
            terms.push(format!("{} {}", pair[0], pair[1]));
        }
        terms
    }
}

/// Lowercased token set of a product's brand and product name.
fn brand_tokens(product: &Product) -> HashSet<String> {
    let mut tokens = HashSet::new();
    for field in [&product.brand, &product.product_name] {
        for token in field.to_lowercase().split_whitespace() {
            let trimmed = token.trim_matches(BRAND_TOKEN_TRIM);
            if !trimmed.is_empty() {
                tokens.insert(trimmed.to_string());
            }
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SentimentLabel;

    fn review(id: &str, product: &str, label: SentimentLabel, text: &str) -> Review {
        Review {
            review_id: id.to_string(),
            product_id: product.to_string(),
            rating: 3,
            text: text.to_string(),
            verified: false,
            date: None,
            sentiment_score: Some(0.0),
            sentiment_label: Some(label),
        }
    }

    fn product(id: &str, brand: &str, name: &str) -> Product {
        Product {
            product_id: id.to_string(),
            brand: brand.to_string(),
            product_name: name.to_string(),
            flavor: String::new(),
            size: String::new(),
            notes: String::new(),
        }
    }

    fn extractor(min_df: usize, top_k: usize) -> KeywordExtractor {
        KeywordExtractor::new(KeywordConfig::new(min_df, top_k, &[]))
    }

    #[test]
    fn test_terms_unigrams_and_bigrams() {
        let ex = extractor(1, 10);
        let terms = ex.terms("crunchy kibble texture", &HashSet::new());
        assert!(terms.contains(&"crunchy".to_string()));
        assert!(terms.contains(&"kibble".to_string()));
        assert!(terms.contains(&"crunchy kibble".to_string()));
        assert!(terms.contains(&"kibble texture".to_string()));
    }

    #[test]
    fn test_terms_drop_stopwords_and_short_tokens() {
        let ex = extractor(1, 10);
        let terms = ex.terms("the kibble is a hit", &HashSet::new());
        assert!(!terms.iter().any(|t| t.contains("the")));
        assert!(!terms.iter().any(|t| t.contains("is")));
        // Bigrams form over the filtered sequence
        assert!(terms.contains(&"kibble hit".to_string()));
    }

    #[test]
    fn test_min_df_excludes_rare_terms() {
        let ex = extractor(2, 10);
        let reviews = vec![
            review("r1", "p1", SentimentLabel::Positive, "crunchy kibble wins"),
            review("r2", "p1", SentimentLabel::Positive, "crunchy kibble again"),
            review("r3", "p1", SentimentLabel::Positive, "singleton mention here"),
        ];
        let products = vec![product("p1", "Acme", "Acme Dry Mix")];
        let entries = ex.extract(&reviews, &products);
        assert!(entries.iter().any(|e| e.term == "crunchy"));
        assert!(!entries.iter().any(|e| e.term == "singleton"));
    }

    #[test]
    fn test_brand_tokens_excluded() {
        let ex = extractor(1, 20);
        let reviews = vec![
            review("r1", "p1", SentimentLabel::Positive, "acme kibble crunchy texture"),
            review("r2", "p1", SentimentLabel::Positive, "acme kibble smells fresh"),
        ];
        let products = vec![product("p1", "Acme", "Acme Kibble Deluxe")];
        let entries = ex.extract(&reviews, &products);
        assert!(!entries.is_empty());
        for entry in &entries {
            assert!(!entry.term.split(' ').any(|t| t == "acme" || t == "kibble" || t == "deluxe"));
        }
    }

    #[test]
    fn test_ranking_is_total_and_deterministic() {
        let ex = extractor(1, 50);
        let reviews = vec![
            review("r1", "p1", SentimentLabel::Positive, "crunchy texture crunchy smell"),
            review("r2", "p1", SentimentLabel::Positive, "picky eater approved texture"),
        ];
        let products = vec![product("p1", "Acme", "")];
        let entries = ex.extract(&reviews, &products);

        let mut by_bucket: BTreeMap<Bucket, Vec<&KeywordEntry>> = BTreeMap::new();
        for entry in &entries {
            by_bucket.entry(entry.bucket).or_default().push(entry);
        }
        for bucket_entries in by_bucket.values() {
            for (i, entry) in bucket_entries.iter().enumerate() {
                assert_eq!(entry.rank, i + 1, "ranks must be a strict 1..n sequence");
                if i > 0 {
                    let prev = bucket_entries[i - 1];
                    assert!(prev.score >= entry.score, "scores must be non-increasing");
                    if (prev.score - entry.score).abs() < f64::EPSILON {
                        assert!(prev.term < entry.term, "ties must break lexically");
                    }
                }
            }
        }

        // Identical input gives identical output
        let again = ex.extract(&reviews, &products);
        assert_eq!(entries.len(), again.len());
        for (a, b) in entries.iter().zip(again.iter()) {
            assert_eq!(a.term, b.term);
            assert_eq!(a.rank, b.rank);
        }
    }

    #[test]
    fn test_empty_bucket_yields_no_entries() {
        let ex = extractor(1, 10);
        let reviews = vec![
            review("r1", "p1", SentimentLabel::Positive, "crunchy texture wins"),
            review("r2", "p1", SentimentLabel::Positive, "crunchy texture stays"),
        ];
        let products = vec![product("p1", "Acme", "")];
        let entries = ex.extract(&reviews, &products);
        assert!(entries.iter().any(|e| e.bucket == Bucket::Positive));
        assert!(!entries.iter().any(|e| e.bucket == Bucket::Negative));
        assert!(!entries.iter().any(|e| e.bucket == Bucket::Neutral));
    }

    #[test]
    fn test_top_k_limit() {
        let ex = extractor(1, 2);
        let reviews = vec![
            review("r1", "p1", SentimentLabel::Positive, "alpha beta gamma delta"),
            review("r2", "p1", SentimentLabel::Positive, "alpha beta gamma delta"),
        ];
        let products = vec![product("p1", "", "")];
        let entries = ex.extract(&reviews, &products);
        for bucket in Bucket::ALL {
            let count = entries.iter().filter(|e| e.bucket == bucket).count();
            assert!(count <= 2, "bucket {bucket:?} exceeded top_k");
        }
    }

    #[test]
    fn test_extra_stopwords_respected() {
        let ex = KeywordExtractor::new(KeywordConfig::new(
            1,
            10,
            &["kibble".to_string()],
        ));
        let reviews = vec![
            review("r1", "p1", SentimentLabel::Positive, "kibble crunchy texture"),
            review("r2", "p1", SentimentLabel::Positive, "kibble crunchy smell"),
        ];
        let products = vec![product("p1", "", "")];
        let entries = ex.extract(&reviews, &products);
        assert!(!entries.iter().any(|e| e.term.contains("kibble")));
        assert!(entries.iter().any(|e| e.term == "crunchy"));
    }

    #[test]
    fn test_product_without_reviews_yields_nothing() {
        let ex = extractor(1, 10);
        let products = vec![product("p9", "Ghost", "Ghost Food")];
        let entries = ex.extract(&[], &products);
        assert!(entries.is_empty());
    }
}
