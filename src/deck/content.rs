//! The canonical slide registry.
//!
//! Sixteen slides on context attribution for LLM outputs. Each slide is a
//! render function plus the citation keys listed in its footer; animation
//! pacing lives next to the content that uses it.

use std::time::Duration;

use super::slide::{DiagramSpec, SceneBuilder, SlideDescriptor, Span};
use crate::config::{RevealTiming, StepTiming};

use Span::{Cite, Code, Strong, Text};

/// Every slide, in presentation order.
pub fn slides() -> &'static [SlideDescriptor] {
    &SLIDES
}

static SLIDES: [SlideDescriptor; 16] = [
    SlideDescriptor {
        title: "Context Attribution for LLM Outputs",
        render: title,
        references: &["anthropicBiology", "contextCite", "selfRag", "alce", "semanticEntropy", "acmSurvey"],
    },
    SlideDescriptor {
        title: "What is Context Attribution?",
        render: what_is_attribution,
        references: &["acmSurvey", "selfCite"],
    },
    SlideDescriptor {
        title: "Core Attribution Methods",
        render: methods_overview,
        references: &["captum", "integratedGradients"],
    },
    SlideDescriptor {
        title: "Perturbation-Based Attribution",
        render: perturbation,
        references: &["captum"],
    },
    SlideDescriptor {
        title: "Gradient-Based Attribution",
        render: integrated_gradients,
        references: &["integratedGradients", "gim", "contextCite"],
    },
    SlideDescriptor {
        title: "ContextCite",
        render: context_cite,
        references: &["contextCite"],
    },
    SlideDescriptor {
        title: "Circuit Tracing",
        render: circuit_tracing,
        references: &["anthropicBiology", "anthropicCircuitTools", "transformerLens"],
    },
    SlideDescriptor {
        title: "Training Data Attribution",
        render: training_data,
        references: &["logra", "dda", "influenceFunctionsWork"],
    },
    SlideDescriptor {
        title: "Self-RAG",
        render: self_rag,
        references: &["selfRag"],
    },
    SlideDescriptor {
        title: "RAG Attribution Benchmarks",
        render: rag_benchmarks,
        references: &["alce", "longCite", "semanticIllusion"],
    },
    SlideDescriptor {
        title: "Faithfulness Evaluation",
        render: faithfulness,
        references: &["semanticIllusion", "semanticEntropy", "dda", "faithLens", "alce"],
    },
    SlideDescriptor {
        title: "Advanced Attribution Methods",
        render: advanced_methods,
        references: &["camab", "start", "longCite"],
    },
    SlideDescriptor {
        title: "Production Citation APIs",
        render: production_apis,
        references: &["alce"],
    },
    SlideDescriptor {
        title: "Use Cases",
        render: use_cases,
        references: &["humanTrust", "semanticEntropy"],
    },
    SlideDescriptor {
        title: "Agent Attribution",
        render: agent_attribution,
        references: &["contextCite", "captum"],
    },
    SlideDescriptor {
        title: "Future Directions & Key Takeaways",
        render: conclusion,
        references: &["anthropicBiology", "darioInterpretability", "start", "acmSurvey"],
    },
];

// =============================================================================
// SLIDES
// =============================================================================

fn title(s: &mut SceneBuilder) {
    s.title("Context Attribution for LLM Outputs");
    s.subheading("Tracing what an LLM says back to why it said it");
    s.paragraph("The foundation of AI safety, reliability, and trust.");
    s.spacer();
    s.tags(&["Mechanistic Interpretability", "RAG Verification", "Agent Debugging"]);
}

fn what_is_attribution(s: &mut SceneBuilder) {
    s.title("What is Context Attribution?");
    s.paragraph([
        Text("Context attribution answers a fundamental question: which parts of the input context influenced the model's output?"),
        Cite("acmSurvey"),
    ]);
    s.callout(
        "Corroborative",
        "What context supports a generated statement? Used for citation verification and fact-checking.",
    );
    s.callout(
        "Contributive",
        "What context caused the generation? Used for debugging and understanding model behavior.",
    );
    s.heading("Why it matters");
    s.bullet("Verify factual claims");
    s.bullet("Debug agent behavior");
    s.bullet([Text("Detect hallucinations"), Cite("selfCite")]);
    s.bullet("Meet regulatory requirements");
}

fn methods_overview(s: &mut SceneBuilder) {
    s.title("Core Attribution Methods");
    s.paragraph([
        Text("Two fundamental approaches to understanding model behavior, following the LLM attribution API of"),
        Strong("Captum"),
        Cite("captum"),
    ]);
    s.heading("Perturbation-based");
    s.paragraph("Remove or modify input features and observe how the output probability changes. Model-agnostic; works with any LLM API.");
    s.bullet([Strong("Feature Ablation"), Text("replace each feature with a baseline")]);
    s.bullet([Strong("Shapley Values"), Text("fair attribution across feature coalitions")]);
    s.bullet([Strong("LIME / KernelSHAP"), Text("interpretable surrogate on perturbed samples")]);
    s.heading("Gradient-based");
    s.paragraph("Gradients of the output with respect to input embeddings. Requires model access; a single backward pass.");
    s.bullet([Strong("Layer Integrated Gradients"), Cite("integratedGradients")]);
    s.bullet([Strong("Layer Gradient × Activation")]);
    s.bullet([Strong("Layer GradientSHAP")]);
    s.subheading("Inputs: TextTokenInput (sub-word tokens) or TextTemplateInput (semantic segments)");
}

fn perturbation(s: &mut SceneBuilder) {
    s.title("Perturbation-Based Attribution");
    s.paragraph([
        Text("Replace features with baselines and measure how output probability changes, using"),
        Code("TextTemplateInput"),
        Text("for semantic segments."),
    ]);
    s.steps(
        6,
        StepTiming {
            cadence: Duration::from_millis(800),
            autoplay: true,
            looping: false,
        },
        &["Start", "name", "city", "state", "occupation", "pronoun"],
    );
    s.paragraph([
        Code("{name} lives in {city}, {state} and is a {occupation}. {pronoun} personal interests include"),
    ]);
    s.step_detail(&[
        "Ablating... 0/5",
        "Ablating... 1/5  Dave → Sarah",
        "Ablating... 2/5  Palm Coast → Seattle",
        "Ablating... 3/5  FL → WA",
        "Ablating... 4/5  lawyer → doctor",
        "Ablation complete",
    ]);
    s.controls();
    s.heading("Attribution to target \"playing golf, hiking, and cooking.\"");
    s.at_step(1, |s| {
        s.bar("name", 0.12, "12.0%");
    });
    s.at_step(2, |s| {
        s.bar("city", 0.35, "35.0%");
    });
    s.at_step(3, |s| {
        s.bar("state", 0.18, "18.0%");
    });
    s.at_step(4, |s| {
        s.bar("occupation", 0.28, "28.0%");
    });
    s.at_step(5, |s| {
        s.bar("pronoun", 0.07, "7.0%");
        s.callout("Finding", "Location (city) has the strongest influence on predicted interests.");
    });
}

fn integrated_gradients(s: &mut SceneBuilder) {
    s.title("Gradient-Based Attribution: Mathematical Foundations");
    s.subheading("Sundararajan et al. (ICML 2017): an axiomatic approach to feature attribution");
    s.heading("Attribution axioms");
    s.bullet([Strong("Sensitivity"), Text("changing a feature that changes the output gives it non-zero attribution")]);
    s.bullet([Strong("Implementation invariance"), Text("identical functions get identical attributions")]);
    s.bullet([Strong("Completeness"), Code("Σᵢ Attrᵢ(x) = F(x) − F(x')")]);
    s.bullet([Strong("Linearity"), Code("Attr(αF + βG) = αAttr(F) + βAttr(G)")]);
    s.heading("Integrated Gradients");
    s.paragraph([Code("IGᵢ(x) = (xᵢ − x'ᵢ) × ∫₀¹ ∂F(x' + α(x − x')) / ∂xᵢ dα"), Cite("integratedGradients")]);
    s.paragraph("The baseline x' is a zero embedding, empty string or masked input; α interpolates from baseline to input.");
    s.callout(
        "In practice",
        [
            Text("Gradient methods need open weights; for API-only models, surrogate approaches such as ContextCite apply"),
            Cite("contextCite"),
            Text("and gradient interaction modifications sharpen attributions for transformers"),
            Cite("gim"),
        ],
    );
}

fn context_cite(s: &mut SceneBuilder) {
    s.title("ContextCite: Scalable Context Attribution");
    s.paragraph([
        Text("MIT/MadryLab (NeurIPS 2024): a LASSO-based sparse linear surrogate for efficient RAG context attribution"),
        Cite("contextCite"),
    ]);
    s.meter(
        "~ablations needed",
        RevealTiming {
            delay: Duration::ZERO,
            tick: Duration::from_millis(50),
            increment: 1,
            target: 32,
        },
        "",
    );
    s.subheading("even with hundreds of sources");
    s.paragraph([Code("minimize ||y − Xβ||² + λ||β||₁")]);
    s.paragraph("The L1 penalty forces sparsity: most sources have zero influence, so few samples suffice.");
    s.heading("RAG source attribution");
    s.paragraph([Strong("Response:"), Text("\"The Eiffel Tower is a 330-meter iron structure in Paris, built 1887-1889.\"")]);
    s.bar("[1] Eiffel Tower facts", 0.92, "relevant");
    s.bar("[2] Paris history", 0.41, "relevant");
    s.bar("[3] French cuisine", 0.03, "irrelevant");
}

fn circuit_tracing(s: &mut SceneBuilder) {
    s.title("Circuit Tracing");
    s.paragraph([
        Text("Attribution graphs follow features through the model's layers, showing multi-hop reasoning inside a single forward pass"),
        Cite("anthropicBiology"),
    ]);
    s.steps(
        5,
        StepTiming {
            cadence: Duration::from_millis(1200),
            autoplay: false,
            looping: false,
        },
        &["Input", "Layer 1", "Layer 2", "Output", "Circuit"],
    );
    s.diagram(
        DiagramSpec::new(67, 9)
            .line((9, 0), (19, 2), 1, 0)
            .line((9, 4), (19, 4), 1, 100)
            .line((9, 8), (19, 6), 1, 200)
            .line((28, 2), (38, 2), 2, 300)
            .line((28, 4), (38, 4), 2, 400)
            .line((28, 6), (38, 6), 2, 500)
            .line((48, 2), (58, 4), 3, 600)
            .line((48, 4), (58, 4), 3, 700)
            .line((48, 6), (58, 4), 3, 800)
            .node((0, 0), "Dallas", 0, 0)
            .node((0, 4), "capital", 0, 50)
            .node((0, 8), "state", 0, 100)
            .node((20, 2), "city", 1, 200)
            .node((20, 4), "Texas", 1, 250)
            .node((20, 6), "query", 1, 300)
            .node((39, 2), "state", 2, 400)
            .node((39, 4), "capital", 2, 450)
            .node((39, 6), "US", 2, 500)
            .node((59, 4), "Austin", 3, 700),
    );
    s.step_list();
    s.step_detail(&[
        "Prompt: \"the capital of the state containing Dallas\"",
        "Layer 1 features: Dallas → Texas",
        "Layer 2 features: state capital lookup",
        "Output: Austin",
        "The full two-hop circuit is visible",
    ]);
    s.controls();
    s.paragraph([Text("Open tooling:"), Cite("anthropicCircuitTools"), Cite("transformerLens")]);
}

fn training_data(s: &mut SceneBuilder) {
    s.title("Training Data Attribution");
    s.subheading("Tracing predictions back to influential training examples");
    s.callout(
        "Critical finding",
        [
            Text("Standard influence functions perform poorly at LLM scale; simple baselines like BM25 often win for factual attribution"),
            Cite("influenceFunctionsWork"),
        ],
    );
    s.bullet([Strong("LoGra"), Text("6,500× throughput via low-rank gradient projection"), Cite("logra")]);
    s.bullet([Strong("RepSim"), Text("~100% identification rate with representation similarity")]);
    s.bullet([Strong("DDA"), Text("93.5% AUC on hallucination tracing"), Cite("dda")]);
    s.heading("Why influence functions fail at scale");
    s.tags(&["Hessian approximation", "Non-convexity", "Training dynamics", "Distributed knowledge"]);
}

fn self_rag(s: &mut SceneBuilder) {
    s.title("Self-RAG: Learning to Retrieve, Generate, and Critique");
    s.paragraph([
        Text("The model emits reflection tokens to decide when to retrieve and whether its output is supported"),
        Cite("selfRag"),
    ]);
    s.steps(
        6,
        StepTiming {
            cadence: Duration::from_millis(1500),
            autoplay: false,
            looping: true,
        },
        &["Query", "Retrieve", "[IsRel]", "Generate", "[IsSup]", "Cite"],
    );
    s.step_list();
    s.step_detail(&[
        "User asks a question",
        "Fetch relevant documents",
        "Check relevance",
        "LLM creates response",
        "Verify support",
        "Add citations",
    ]);
    s.controls();
    s.heading("Reflection tokens");
    s.bullet([Code("[Retrieve]"), Text("decide whether retrieval is needed")]);
    s.bullet([Code("[IsRel]"), Text("is the passage relevant?")]);
    s.bullet([Code("[IsSup]"), Text("is the generation supported?")]);
    s.bullet([Code("[IsUse]"), Text("is the response useful?")]);
}

fn rag_benchmarks(s: &mut SceneBuilder) {
    s.title("RAG Attribution Benchmarks");
    s.subheading("Standardized frameworks for measuring citation quality and faithfulness");
    s.heading("ALCE");
    s.paragraph([
        Text("Princeton NLP (EMNLP 2023): the first systematic evaluation of RAG citation quality"),
        Cite("alce"),
    ]);
    s.tags(&["ASQA: ambiguous factoid QA", "QAMPARI: list QA", "ELI5: long-form how/why"]);
    s.callout("Key finding", "~50%: even GPT-4 lacks complete citation support on ELI5.");
    s.heading("Faithfulness evaluation");
    s.bullet([Strong("NLI-based checking"), Text("TRUE (T5-11B) checks that cited passages entail statements")]);
    s.bullet([Strong("RAGAS"), Text("verifies each statement against context and averages")]);
    s.bullet([Strong("Long-context citing"), Cite("longCite")]);
    s.bullet([Strong("Semantic illusion"), Text("embeddings fail on real hallucinations"), Cite("semanticIllusion")]);
}

fn faithfulness(s: &mut SceneBuilder) {
    s.title("Faithfulness Evaluation: The Semantic Illusion Problem");
    s.paragraph("Detecting text that is not grounded in retrieved context is harder than benchmarks suggest.");
    s.callout(
        "Semantic illusion (2025)",
        [
            Text("Embedding-based detection reaches ~95% on synthetic benchmarks but a 100% false positive rate on real hallucinations; GPT-4 reasoning gets 7%"),
            Cite("semanticIllusion"),
        ],
    );
    s.bar("Embeddings FPR", 1.0, "100%");
    s.bar("GPT-4 FPR", 0.07, "7%");
    s.heading("RAGAS faithfulness pipeline");
    s.bullet([Strong("Decompose"), Text("break the response into atomic statements")]);
    s.bullet([Strong("Verify"), Text("check each statement against context")]);
    s.bullet([Strong("Score"), Text("supported (1) or unsupported (0)")]);
    s.bullet([Strong("Aggregate"), Code("Faithfulness = (1/N) × Σ v(sᵢ, C)")]);
    s.paragraph([
        Text("Alternatives: semantic entropy"),
        Cite("semanticEntropy"),
        Text(", debiased attribution"),
        Cite("dda"),
        Text(", FaithLens"),
        Cite("faithLens"),
    ]);
}

fn advanced_methods(s: &mut SceneBuilder) {
    s.title("Advanced Attribution Methods (2024-2025)");
    s.subheading("Research addressing efficiency, granularity, and scalability");
    s.bullet([Strong("TokenShapley"), Text("+11-23% accuracy: token-level Shapley values for numbers, years and names")]);
    s.bullet([Strong("AttriBoT"), Text(">300× speedup for leave-one-out with cached activations and proxy models")]);
    s.bullet([Strong("TracLLM"), Text("89% poison detection: long-context traceback with score denoising")]);
    s.bullet([Strong("AT2"), Text("one forward pass: learns to attribute from attention patterns")]);
    s.heading("Related");
    s.bullet([Text("Multi-armed bandit attribution"), Cite("camab")]);
    s.bullet([Text("Self-improving attribution with synthetic data"), Cite("start")]);
    s.bullet([Text("Fine-grained long-context citations"), Cite("longCite")]);
}

fn production_apis(s: &mut SceneBuilder) {
    s.title("Production Citation APIs");
    s.subheading("Native attribution from major AI providers");
    s.heading("Anthropic Citations");
    s.paragraph("+15% recall vs prompting. Sentence-level chunking; citations cost no output tokens.");
    s.paragraph([Code("\"citations\": [{ \"document_id\": \"doc_1\", \"cited_text\": \"...\" }]")]);
    s.heading("Google Gemini Grounding");
    s.paragraph("groundingMetadata with confidence scores and a dynamic retrieval threshold.");
    s.paragraph([Code("\"groundingSupports\": [{ \"segment\": {...}, \"confidenceScores\": [0.95] }]")]);
    s.heading("OpenAI Web Search");
    s.paragraph("Built-in inline citations as url_citation annotations; streaming compatible.");
    s.paragraph([Code("\"annotations\": [{ \"type\": \"url_citation\", \"url\": \"...\" }]")]);
    s.heading("Observability");
    s.tags(&["Langfuse", "LangSmith", "Arize Phoenix"]);
    s.paragraph([Text("Citation quality can be scored offline with ALCE-style metrics"), Cite("alce")]);
}

fn use_cases(s: &mut SceneBuilder) {
    s.title("Use Cases");
    s.heading("Agent debugging");
    s.paragraph("Logged prompts, actions and retrieval events localize errors and bottlenecks.");
    s.heading("Trust calibration");
    s.paragraph([
        Text("Explanations only increase appropriate reliance when users can compare responses"),
        Cite("humanTrust"),
    ]);
    s.heading("Hallucination detection");
    s.paragraph([Text("Semantic entropy detects hallucinations with 89-91% accuracy"), Cite("semanticEntropy")]);
    s.heading("Regulatory compliance");
    s.paragraph("EU AI Act transparency for high-risk systems (compliance by Aug 2026); GDPR Article 22 explanations.");
}

fn agent_attribution(s: &mut SceneBuilder) {
    s.title("Agent Attribution: Tools + RAG");
    s.paragraph("Attribute both tool selection and response generation using log-probability differences.");
    s.heading("Tool selection: why call this tool?");
    s.paragraph([Code("order_lookup({'order_id': 'ORDER-98234'})")]);
    s.bar("History turn", 0.9, "order number");
    s.bar("System prompt", 0.35, "");
    s.bar("RAG passage", 0.1, "");
    s.heading("Response generation: what informed the answer?");
    s.bar("Tool output", 0.86, "6× RAG");
    s.bar("RAG passage", 0.14, "");
    s.callout(
        "Methods",
        [
            Text("Leave-one-out is cheap and direct; Shapley values capture interactions at higher cost"),
            Cite("contextCite"),
            Cite("captum"),
        ],
    );
}

fn conclusion(s: &mut SceneBuilder) {
    s.title("Future Directions & Key Takeaways");
    s.heading("The attribution gap");
    s.meter(
        "prompts explained",
        RevealTiming {
            delay: Duration::from_millis(500),
            tick: Duration::from_millis(40),
            increment: 1,
            target: 25,
        },
        "%",
    );
    s.paragraph([
        Text("Even state-of-the-art circuit tracing gives satisfying explanations for only ~25% of prompts examined"),
        Cite("anthropicBiology"),
    ]);
    s.heading("Emerging research");
    s.bullet("Explainability by design: neurosymbolic models with knowledge graphs");
    s.bullet([Text("Self-improving attribution with preference optimization"), Cite("start")]);
    s.bullet("Causal inference: from correlation to counterfactuals");
    s.heading("Path forward");
    s.bullet([Strong("Native APIs"), Text("Anthropic Citations, Google Grounding")]);
    s.bullet([Strong("Observability"), Text("Langfuse or LangSmith in production")]);
    s.bullet([
        Strong("Realistic expectations"),
        Text("current methods give partial explanations"),
        Cite("darioInterpretability"),
    ]);
    s.paragraph([Text("Survey:"), Cite("acmSurvey")]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::citations::registry;
    use crate::deck::slide::Block;

    #[test]
    fn test_sixteen_slides() {
        assert_eq!(slides().len(), 16);
        assert_eq!(slides()[0].title, "Context Attribution for LLM Outputs");
        assert_eq!(slides()[15].title, "Future Directions & Key Takeaways");
    }

    #[test]
    fn test_all_citation_keys_resolve() {
        for slide in slides() {
            for key in slide.references {
                assert!(registry::lookup(key).is_some(), "{}: unknown reference {key}", slide.title);
            }
            for key in slide.script().inline_citations() {
                assert!(registry::lookup(key).is_some(), "{}: unknown inline cite {key}", slide.title);
            }
        }
    }

    #[test]
    fn test_every_slide_starts_with_title() {
        for slide in slides() {
            let script = slide.script();
            assert!(matches!(script.blocks.first().map(|g| &g.block), Some(Block::Title(_))));
        }
    }

    #[test]
    fn test_step_details_match_counts() {
        for slide in slides() {
            let script = slide.script();
            let Some(steps) = &script.steps else { continue };
            assert_eq!(steps.labels.len(), steps.count, "{}", slide.title);
            for gated in &script.blocks {
                if let Block::StepDetail(details) = gated.block {
                    assert_eq!(details.len(), steps.count, "{}", slide.title);
                }
                assert!(gated.from_step < steps.count, "{}", slide.title);
            }
        }
    }

    #[test]
    fn test_perturbation_slide_pacing() {
        let steps = slides()[3].script().steps.unwrap();
        assert_eq!(steps.count, 6);
        assert_eq!(steps.timing.cadence, Duration::from_millis(800));
        assert!(steps.timing.autoplay);
    }

    #[test]
    fn test_self_rag_loops() {
        let steps = slides()[8].script().steps.unwrap();
        assert_eq!(steps.count, 6);
        assert!(steps.timing.looping);
        assert!(!steps.timing.autoplay);
        assert_eq!(steps.timing.cadence, Duration::from_millis(1500));
    }

    #[test]
    fn test_gap_meter_counts_to_25() {
        let script = slides()[15].script();
        assert_eq!(script.meters[0].timing.target, 25);
        assert_eq!(script.meters[0].timing.ticks_to_complete(), 25);
    }
}
