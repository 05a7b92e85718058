use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::OnceLock;
use std::time::Instant;

use super::corpus::TrainingCorpus;
use super::tokenizer::{tokenize, DEFAULT_WINDOW};
use crate::models::ClassificationResult;

/// Process-wide classifier, trained on the bundled corpus on first use.
static SHARED: OnceLock<LicenseClassifier> = OnceLock::new();

/// Train the process-wide classifier with `window` and return it.
///
/// Training happens once; later calls return the already trained model and
/// ignore their `window` argument. Call this at startup so the first
/// classification does not pay for training.
pub fn init(window: usize) -> &'static LicenseClassifier {
    SHARED.get_or_init(|| {
        let started = Instant::now();
        let classifier = LicenseClassifier::train(&TrainingCorpus::bundled(), window);
        tracing::info!(
            labels = classifier.labels().len(),
            vocabulary = classifier.vocabulary_size(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "trained license classifier"
        );
        classifier
    })
}

/// The process-wide classifier, training it with the default window if needed.
pub fn shared() -> &'static LicenseClassifier {
    init(DEFAULT_WINDOW)
}

/// Per-label token statistics.
#[derive(Debug, Clone, Default)]
struct LabelStats {
    documents: u32,
    /// Sum over documents of their distinct token count.
    token_total: u64,
    /// Number of documents each token occurs in.
    token_counts: HashMap<String, u32>,
}

/// Naive Bayes classifier over tokenized license texts.
///
/// Features are token presence (binarized multinomial model): a token counts
/// once per document however often it repeats, so long licenses do not win
/// on sheer word frequency. Immutable once trained; share it freely between
/// threads.
#[derive(Debug, Clone)]
pub struct LicenseClassifier {
    labels: Vec<String>,
    stats: Vec<LabelStats>,
    vocabulary: HashSet<String>,
    documents: u32,
    window: usize,
}

impl LicenseClassifier {
    /// Train on every document of `corpus`, tokenized with `window`.
    pub fn train(corpus: &TrainingCorpus, window: usize) -> Self {
        let mut classifier = Self {
            labels: Vec::new(),
            stats: Vec::new(),
            vocabulary: HashSet::new(),
            documents: 0,
            window: window.max(1),
        };

        for (label, text) in corpus.documents() {
            let tokens = tokenize(text, classifier.window);
            if tokens.is_empty() {
                tracing::warn!(license = label, "skipping reference document without tokens");
                continue;
            }
            classifier.add_document(label, tokens);
        }

        classifier
    }

    fn add_document(&mut self, label: &str, tokens: Vec<String>) {
        let distinct: HashSet<String> = tokens.into_iter().collect();

        let idx = match self.labels.iter().position(|l| l == label) {
            Some(idx) => idx,
            None => {
                self.labels.push(label.to_string());
                self.stats.push(LabelStats::default());
                self.labels.len() - 1
            }
        };

        let stats = &mut self.stats[idx];
        stats.documents += 1;
        stats.token_total += distinct.len() as u64;
        for token in distinct {
            *stats.token_counts.entry(token.clone()).or_insert(0) += 1;
            self.vocabulary.insert(token);
        }
        self.documents += 1;
    }

    /// Canonical names this classifier can return.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Merge window used to tokenize training documents and queries.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Most probable license for `text`, or `None` when it has no tokens.
    pub fn classify(&self, text: &str) -> Option<ClassificationResult> {
        self.classify_tokens(&tokenize(text, self.window))
    }

    /// Most probable license for an already tokenized text.
    ///
    /// There is no "none of the above" answer: any non-empty input gets the
    /// best label. Callers wanting a floor should check `confidence`.
    pub fn classify_tokens(&self, tokens: &[String]) -> Option<ClassificationResult> {
        self.rank_tokens(tokens).into_iter().next()
    }

    /// Every label with its posterior probability, most probable first.
    pub fn rank(&self, text: &str) -> Vec<ClassificationResult> {
        self.rank_tokens(&tokenize(text, self.window))
    }

    fn rank_tokens(&self, tokens: &[String]) -> Vec<ClassificationResult> {
        if tokens.is_empty() || self.labels.is_empty() {
            return Vec::new();
        }

        // Ordered so the floating-point sums are reproducible.
        let distinct: BTreeSet<&str> = tokens
            .iter()
            .map(String::as_str)
            .filter(|token| self.vocabulary.contains(*token))
            .collect();

        let log_scores: Vec<f64> = self
            .stats
            .iter()
            .map(|stats| self.log_posterior(stats, &distinct))
            .collect();

        // Softmax, shifted by the max to stay finite.
        let max = log_scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let weights: Vec<f64> = log_scores.iter().map(|s| (s - max).exp()).collect();
        let total: f64 = weights.iter().sum();

        let mut ranked: Vec<ClassificationResult> = self
            .labels
            .iter()
            .zip(weights)
            .map(|(label, weight)| ClassificationResult {
                license: label.clone(),
                confidence: weight / total,
            })
            .collect();

        // Stable sort: ties keep training order.
        ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        ranked
    }

    /// Unnormalized log posterior with Laplace smoothing. `tokens` holds only
    /// known tokens; unseen ones carry no evidence.
    fn log_posterior(&self, stats: &LabelStats, tokens: &BTreeSet<&str>) -> f64 {
        let prior = (stats.documents as f64 / self.documents as f64).ln();
        let denominator = (stats.token_total + self.vocabulary.len() as u64) as f64;

        tokens
            .iter()
            .map(|token| {
                let count = stats.token_counts.get(*token).copied().unwrap_or(0);
                ((count as f64 + 1.0) / denominator).ln()
            })
            .sum::<f64>()
            + prior
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_texts_classify_as_themselves() {
        let corpus = TrainingCorpus::bundled();
        let classifier = shared();

        for (license, text) in corpus.documents() {
            let result = classifier.classify(text).unwrap();
            assert_eq!(result.license, license, "misclassified reference text");

            let ranked = classifier.rank(text);
            assert_eq!(ranked[0].license, license);
            assert!(ranked[1..].iter().all(|r| r.confidence <= ranked[0].confidence));
        }
    }

    #[test]
    fn test_rewrapped_text_still_matches() {
        let corpus = TrainingCorpus::bundled();
        let (_, bsd3) = corpus
            .documents()
            .find(|(name, _)| *name == "BSD 3-Clause")
            .unwrap();
        let rewrapped = bsd3.split_whitespace().collect::<Vec<_>>().join(" ");

        let result = shared().classify(&rewrapped).unwrap();
        assert_eq!(result.license, "BSD 3-Clause");
    }

    #[test]
    fn test_apache_boilerplate_notice() {
        let notice = r#"
            Licensed under the Apache License, Version 2.0 (the "License");
            you may not use this file except in compliance with the License.
            You may obtain a copy of the License at

                http://www.apache.org/licenses/LICENSE-2.0

            Unless required by applicable law or agreed to in writing, software
            distributed under the License is distributed on an "AS IS" BASIS,
            WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
        "#;
        assert_eq!(shared().classify(notice).unwrap().license, "Apache 2.0");
    }

    #[test]
    fn test_empty_input_is_absent() {
        assert!(shared().classify("").is_none());
        assert!(shared().classify(" \n\t ").is_none());
        assert!(shared().classify_tokens(&[]).is_none());
    }

    #[test]
    fn test_unknown_words_still_get_a_label() {
        let result = shared().classify("zzqx wvvk").unwrap();
        assert!(shared().labels().contains(&result.license));
        assert!(result.confidence > 0.0 && result.confidence <= 1.0);
    }

    #[test]
    fn test_confidences_sum_to_one() {
        let ranked = shared().rank("permission is hereby granted free of charge");
        let total: f64 = ranked.iter().map(|r| r.confidence).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(ranked.len(), shared().labels().len());
    }

    #[test]
    fn test_small_corpus() {
        let corpus = TrainingCorpus::new()
            .with_document("Alpha", "alpha beta gamma alpha")
            .with_document("Omega", "omega psi chi omega")
            .with_document("Empty", "--- ...");
        let classifier = LicenseClassifier::train(&corpus, 1);

        assert_eq!(classifier.labels(), ["Alpha", "Omega"]);
        assert_eq!(classifier.classify("ALPHA, gamma!").unwrap().license, "Alpha");
        assert_eq!(classifier.classify("psi omega").unwrap().license, "Omega");
    }

    #[test]
    fn test_untrained_classifier_is_absent() {
        let classifier = LicenseClassifier::train(&TrainingCorpus::new(), 1);
        assert!(classifier.classify("MIT").is_none());
    }
}
