//! Static citation registry.
//!
//! Bibliographic records addressed by a string key (`"alce"`, `"selfRag"`).
//! The table is immutable; lookups are pure and total.

use std::fmt;

/// One bibliographic record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CitationEntry {
    /// Number shown in the inline label, `[id]`.
    pub id: &'static str,
    pub authors: &'static str,
    pub title: &'static str,
    pub venue: &'static str,
    pub year: &'static str,
    pub url: &'static str,
}

impl CitationEntry {
    /// Inline label, e.g. `[4]`.
    pub fn label(&self) -> String {
        format!("[{}]", self.id)
    }

    /// `"EMNLP 2023"`
    pub fn venue_line(&self) -> String {
        format!("{} {}", self.venue, self.year)
    }
}

impl fmt::Display for CitationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}. {}, {}.", self.authors, self.title, self.venue, self.year)
    }
}

/// Label rendered for keys that are not in the registry.
pub const UNKNOWN_LABEL: &str = "[?]";

static CITATIONS: &[(&str, CitationEntry)] = &[
    (
        "anthropicBiology",
        CitationEntry {
            id: "1",
            authors: "Anthropic",
            title: "On the Biology of a Large Language Model",
            venue: "Transformer Circuits",
            year: "2025",
            url: "https://transformer-circuits.pub/2025/attribution-graphs/biology.html",
        },
    ),
    (
        "anthropicCircuitTools",
        CitationEntry {
            id: "2",
            authors: "Anthropic",
            title: "Open-sourcing circuit-tracing tools",
            venue: "Anthropic Research",
            year: "2025",
            url: "https://www.anthropic.com/research/open-source-circuit-tracing",
        },
    ),
    (
        "darioInterpretability",
        CitationEntry {
            id: "3",
            authors: "Dario Amodei",
            title: "The Urgency of Interpretability",
            venue: "Blog Post",
            year: "2025",
            url: "https://www.darioamodei.com/post/the-urgency-of-interpretability",
        },
    ),
    (
        "alce",
        CitationEntry {
            id: "4",
            authors: "Gao et al.",
            title: "ALCE: Automatic Benchmark for LLM Generations with Citations",
            venue: "EMNLP",
            year: "2023",
            url: "https://arxiv.org/abs/2305.14627",
        },
    ),
    (
        "selfRag",
        CitationEntry {
            id: "5",
            authors: "Asai et al.",
            title: "Self-RAG: Learning to Retrieve, Generate, and Critique through Self-Reflection",
            venue: "arXiv",
            year: "2023",
            url: "https://arxiv.org/abs/2310.11511",
        },
    ),
    (
        "contextCite",
        CitationEntry {
            id: "8",
            authors: "Gao et al.",
            title: "ContextCite: Attributing Model Generation to Context",
            venue: "NeurIPS",
            year: "2024",
            url: "https://arxiv.org/abs/2409.00729",
        },
    ),
    (
        "faithLens",
        CitationEntry {
            id: "9",
            authors: "Authors",
            title: "FaithLens: Detecting and Explaining Faithfulness Hallucination",
            venue: "arXiv",
            year: "2024",
            url: "https://arxiv.org/html/2512.20182",
        },
    ),
    (
        "semanticIllusion",
        CitationEntry {
            id: "10",
            authors: "Authors",
            title: "The Semantic Illusion: Certified Limits of Embedding-Based Hallucination Detection",
            venue: "arXiv",
            year: "2025",
            url: "https://arxiv.org/html/2512.15068",
        },
    ),
    (
        "humanTrust",
        CitationEntry {
            id: "11",
            authors: "Authors",
            title: "Why Would You Suggest That? Human Trust in Language Model Responses",
            venue: "CHI",
            year: "2025",
            url: "https://arxiv.org/html/2406.02018v1",
        },
    ),
    (
        "acmSurvey",
        CitationEntry {
            id: "12",
            authors: "Zhao et al.",
            title: "Explainability for Large Language Models: A Survey",
            venue: "ACM TIST",
            year: "2024",
            url: "https://dl.acm.org/doi/10.1145/3639372",
        },
    ),
    (
        "transformerLens",
        CitationEntry {
            id: "16",
            authors: "Neel Nanda et al.",
            title: "TransformerLens: Mechanistic Interpretability Library",
            venue: "GitHub",
            year: "2024",
            url: "https://github.com/TransformerLensOrg/TransformerLens",
        },
    ),
    (
        "captum",
        CitationEntry {
            id: "17",
            authors: "Meta/PyTorch",
            title: "Captum: Model Interpretability for PyTorch",
            venue: "GitHub",
            year: "2024",
            url: "https://captum.ai",
        },
    ),
    (
        "integratedGradients",
        CitationEntry {
            id: "32",
            authors: "Sundararajan et al.",
            title: "Axiomatic Attribution for Deep Networks (Integrated Gradients)",
            venue: "ICML",
            year: "2017",
            url: "https://arxiv.org/abs/1703.01365",
        },
    ),
    (
        "logra",
        CitationEntry {
            id: "33",
            authors: "CMU/Toronto",
            title: "LoGra: LLM-Scale Data Valuation with Influence Functions",
            venue: "ICLR",
            year: "2025",
            url: "https://arxiv.org/abs/2405.13954",
        },
    ),
    (
        "semanticEntropy",
        CitationEntry {
            id: "34",
            authors: "Farquhar et al.",
            title: "Detecting Hallucinations Using Semantic Entropy",
            venue: "Nature",
            year: "2024",
            url: "https://www.nature.com/articles/s41586-024-07421-0",
        },
    ),
    (
        "gim",
        CitationEntry {
            id: "35",
            authors: "Authors",
            title: "GIM: Gradient Interaction Modifications for Improved Interpretability",
            venue: "arXiv",
            year: "2025",
            url: "https://arxiv.org/abs/2505.17630",
        },
    ),
    (
        "start",
        CitationEntry {
            id: "36",
            authors: "Authors",
            title: "START: Self-Taught AttRibuTion Framework",
            venue: "EMNLP",
            year: "2024",
            url: "https://arxiv.org/abs/2410.13298",
        },
    ),
    (
        "selfCite",
        CitationEntry {
            id: "43",
            authors: "Authors",
            title: "SelfCite: Self-Supervised Alignment for Context Attribution",
            venue: "arXiv",
            year: "2025",
            url: "https://arxiv.org/html/2502.09604",
        },
    ),
    (
        "camab",
        CitationEntry {
            id: "44",
            authors: "Authors",
            title: "CAMAB: Context Attribution with Multi-Armed Bandit Optimization",
            venue: "arXiv",
            year: "2025",
            url: "https://arxiv.org/html/2506.19977",
        },
    ),
    (
        "influenceFunctionsWork",
        CitationEntry {
            id: "45",
            authors: "Authors",
            title: "Do Influence Functions Work on Large Language Models?",
            venue: "arXiv",
            year: "2024",
            url: "https://arxiv.org/html/2409.19998v1",
        },
    ),
    (
        "dda",
        CitationEntry {
            id: "46",
            authors: "Authors",
            title: "Enhancing Training Data Attribution with Fitting Error (DDA)",
            venue: "arXiv",
            year: "2024",
            url: "https://arxiv.org/abs/2410.01285",
        },
    ),
    (
        "longCite",
        CitationEntry {
            id: "48",
            authors: "THUDM",
            title: "LongCite: Enabling LLMs to Generate Fine-grained Citations in Long-context QA",
            venue: "arXiv",
            year: "2024",
            url: "https://arxiv.org/abs/2409.02897",
        },
    ),
];

/// Look up a citation by key.
pub fn lookup(key: &str) -> Option<&'static CitationEntry> {
    CITATIONS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, entry)| entry)
}

/// Inline label for a key: `[id]` when known, [`UNKNOWN_LABEL`] otherwise.
pub fn label(key: &str) -> String {
    lookup(key).map_or_else(|| UNKNOWN_LABEL.to_string(), CitationEntry::label)
}

/// Every `(key, entry)` pair, in registry order.
pub fn entries() -> impl Iterator<Item = (&'static str, &'static CitationEntry)> {
    CITATIONS.iter().map(|(key, entry)| (*key, entry))
}

pub fn len() -> usize {
    CITATIONS.len()
}
